use serde::Deserialize;

use crate::piece_table::buffers::DEFAULT_SLACK;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Extra capacity reserved when a new add buffer is allocated. Inserted
    /// text is appended to the same buffer until it is full.
    pub add_buffer_slack: usize,

    /// Merge adjacent inserts or deletes into one undo step
    pub coalesce: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            add_buffer_slack: DEFAULT_SLACK,
            coalesce: true,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn deserialize() {
        let opts: Options = toml::from_str("add_buffer_slack = 16\ncoalesce = false").unwrap();
        assert_eq!(16, opts.add_buffer_slack);
        assert!(!opts.coalesce);
    }

    #[test]
    fn deserialize_defaults() {
        let opts: Options = toml::from_str("coalesce = false").unwrap();
        assert_eq!(DEFAULT_SLACK, opts.add_buffer_slack);

        let opts: Options = toml::from_str("").unwrap();
        assert_eq!(Options::default(), opts);
    }
}
