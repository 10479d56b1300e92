//! Document acquisition: local files or HTTP.
//!
//! The rule modules of one invocation have no ordering dependency among
//! themselves, so they are fetched concurrently; merging needs all of them,
//! so this joins before returning. Failures surface to the caller -- no
//! retries here.

use std::fs;
use std::thread;

/// Fetch every source, preserving input order.
pub(crate) fn fetch_all(sources: &[String]) -> Result<Vec<String>, String> {
    thread::scope(|scope| {
        let handles: Vec<_> = sources
            .iter()
            .map(|source| scope.spawn(move || fetch(source)))
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err("fetch worker panicked".to_string()))
            })
            .collect()
    })
}

fn fetch(source: &str) -> Result<String, String> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let agent = ureq::Agent::new_with_defaults();
        let response = agent
            .get(source)
            .call()
            .map_err(|e| format!("could not fetch '{}': {}", source, e))?;
        response
            .into_body()
            .read_to_string()
            .map_err(|e| format!("error reading response from '{}': {}", source, e))
    } else {
        fs::read_to_string(source).map_err(|e| format!("could not read '{}': {}", source, e))
    }
}
