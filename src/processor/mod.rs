pub mod aggregator;
pub mod export;
pub mod forecast;
pub mod report;
pub mod validator;
