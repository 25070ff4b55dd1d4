//! Command-line entry point: a single positional test case number.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "harbor-core", about = "Harbor scheduling core")]
pub struct Cli {
    /// Test case number; reads `testcase<N>/input.txt`.
    pub testcase: u32,
}
