#[cfg(test)]
mod concurrency_tests;
#[cfg(test)]
pub(crate) mod helpers;
