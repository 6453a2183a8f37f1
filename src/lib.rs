pub mod city;
pub mod filters;
pub mod loader;
pub mod output;
pub mod report;
pub mod session;
pub mod stats;
pub mod trip;
