pub mod companies;
pub mod jobs;

#[cfg(test)]
pub mod fixtures;
