mod forager;
mod podium;
