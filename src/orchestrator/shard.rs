/// A contiguous slice of the domain list assigned to one worker process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    /// Position of this shard in the plan, starting at 0
    pub index: usize,

    /// Domains in their original order
    pub domains: Vec<String>,
}

/// Splits `domains` into consecutive shards of at most `shard_size` entries
///
/// A `shard_size` of 0 is treated as 1. The concatenation of the returned
/// shards is exactly `domains`.
///
/// # Examples
///
/// ```
/// use blub_crawler::orchestrator::plan_shards;
///
/// let domains: Vec<String> = ["a.com", "b.com", "c.com"].iter().map(|d| d.to_string()).collect();
/// let shards = plan_shards(&domains, 2);
/// assert_eq!(shards.len(), 2);
/// assert_eq!(shards[0].domains, vec!["a.com", "b.com"]);
/// assert_eq!(shards[1].domains, vec!["c.com"]);
/// ```
pub fn plan_shards(domains: &[String], shard_size: usize) -> Vec<Shard> {
    domains
        .chunks(shard_size.max(1))
        .enumerate()
        .map(|(index, chunk)| Shard {
            index,
            domains: chunk.to_vec(),
        })
        .collect()
}
