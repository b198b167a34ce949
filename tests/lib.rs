mod extract;
mod suite;
mod throughput;
