mod config_watcher;
mod pipeline_finalizer;
