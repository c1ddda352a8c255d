mod batch;
mod config_file;
mod convergence;
mod envelope;
