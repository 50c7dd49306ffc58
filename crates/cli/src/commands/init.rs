// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use crate::config::init_data_dir;
use crate::error::Result;

pub fn run(data_dir: &Path, remote: Option<String>) -> Result<()> {
    let config = init_data_dir(data_dir, remote)?;
    println!("Initialized liftlog in {}", data_dir.display());
    println!("Remote: {}", config.remote.url);
    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
