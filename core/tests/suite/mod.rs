mod client;
mod invoke;
