pub mod fetcher;
pub mod notifier;
pub mod poller;
