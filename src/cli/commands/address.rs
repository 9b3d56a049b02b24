//! `farmacie address`.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::Context;
use console::style;

use crate::config::Config;
use crate::output::append_full_address;

pub async fn cmd_address(config: &Config, input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input));

    let reader = File::open(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let writer = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let rows = append_full_address(
        BufReader::new(reader),
        BufWriter::new(writer),
        &config.output.country,
        config.output.bom,
    )
    .with_context(|| format!("Failed to format addresses from {}", input.display()))?;

    println!(
        "{} Added full addresses to {} rows",
        style("✓").green(),
        rows
    );
    println!("  {} {}", style("Saved:").dim(), output.display());
    Ok(())
}

/// `<dir>/<stem>_full_address.csv`.
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "farmacie".to_string());
    input.with_file_name(format!("{}_full_address.csv", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output() {
        assert_eq!(
            default_output(Path::new("out/farmacie_lazio_roma.csv")),
            PathBuf::from("out/farmacie_lazio_roma_full_address.csv")
        );
    }

    #[tokio::test]
    async fn test_cmd_address_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        std::fs::write(&input, "Address,Postal Code,Municipality\nVIA ROMA 1,186,ROMA\n").unwrap();

        let mut config = Config::default();
        config.output.bom = false;
        cmd_address(&config, &input, None).await.unwrap();

        let written = std::fs::read_to_string(dir.path().join("in_full_address.csv")).unwrap();
        assert!(written.contains("\"VIA ROMA 1, 00186, ROMA, Italia\""));
    }
}
