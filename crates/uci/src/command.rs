//! `go` command vocabulary shared between the driver and its callers.

/// Options for the `go` command.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GoOptions {
    /// Search for exactly this time in milliseconds.
    pub movetime: Option<u64>,
    /// Search to this depth.
    pub depth: Option<u32>,
    /// Search until exactly this many nodes have been examined.
    pub nodes: Option<u64>,
    /// White time remaining in milliseconds.
    pub wtime: Option<u64>,
    /// Black time remaining in milliseconds.
    pub btime: Option<u64>,
    /// White increment per move in milliseconds.
    pub winc: Option<u64>,
    /// Black increment per move in milliseconds.
    pub binc: Option<u64>,
    /// Moves to go until next time control.
    pub movestogo: Option<u32>,
    /// Search indefinitely until `stop`.
    pub infinite: bool,
}

impl GoOptions {
    /// Renders this as the argument tail of a `go` command, e.g. `go movetime 1000`.
    pub fn to_command(&self) -> String {
        let mut parts = vec!["go".to_string()];
        if let Some(v) = self.movetime {
            parts.push(format!("movetime {}", v));
        }
        if let Some(v) = self.depth {
            parts.push(format!("depth {}", v));
        }
        if let Some(v) = self.nodes {
            parts.push(format!("nodes {}", v));
        }
        if let Some(v) = self.wtime {
            parts.push(format!("wtime {}", v));
        }
        if let Some(v) = self.btime {
            parts.push(format!("btime {}", v));
        }
        if let Some(v) = self.winc {
            parts.push(format!("winc {}", v));
        }
        if let Some(v) = self.binc {
            parts.push(format!("binc {}", v));
        }
        if let Some(v) = self.movestogo {
            parts.push(format!("movestogo {}", v));
        }
        if self.infinite {
            parts.push("infinite".to_string());
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_command_minimal() {
        let opts = GoOptions {
            movetime: Some(1000),
            ..Default::default()
        };
        assert_eq!(opts.to_command(), "go movetime 1000");
    }

    #[test]
    fn to_command_depth_and_nodes() {
        let opts = GoOptions {
            depth: Some(10),
            nodes: Some(50000),
            ..Default::default()
        };
        assert_eq!(opts.to_command(), "go depth 10 nodes 50000");
    }

    #[test]
    fn to_command_infinite() {
        let opts = GoOptions {
            infinite: true,
            ..Default::default()
        };
        assert_eq!(opts.to_command(), "go infinite");
    }

    #[test]
    fn to_command_full_time_control() {
        let opts = GoOptions {
            wtime: Some(60000),
            btime: Some(60000),
            winc: Some(1000),
            binc: Some(1000),
            movestogo: Some(40),
            ..Default::default()
        };
        assert_eq!(
            opts.to_command(),
            "go wtime 60000 btime 60000 winc 1000 binc 1000 movestogo 40"
        );
    }

    #[test]
    fn to_command_empty_is_bare_go() {
        assert_eq!(GoOptions::default().to_command(), "go");
    }
}
