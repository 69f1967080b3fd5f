use std::process::Command;

use anyhow::{Context, Result};

/// One `cargo test` invocation of the feature matrix.
struct FeatureSet {
    label: &'static str,
    no_default: bool,
    features: &'static [&'static str],
}

const FEATURE_COMBINATIONS: &[FeatureSet] = &[
    FeatureSet { label: "default", no_default: false, features: &[] },
    FeatureSet { label: "no-default-features", no_default: true, features: &[] },
    FeatureSet { label: "self-signed", no_default: true, features: &["self-signed"] },
];

/// Check that every supported feature combination builds and passes tests.
pub fn test_feature_matrix() -> Result<()> {
    println!("Testing {} courier-infra feature combinations...", FEATURE_COMBINATIONS.len());

    for (index, set) in FEATURE_COMBINATIONS.iter().enumerate() {
        let mut args = vec!["test", "-p", "courier-infra"];
        if set.no_default {
            args.push("--no-default-features");
        }
        let joined = set.features.join(",");
        if !joined.is_empty() {
            args.push("--features");
            args.push(joined.as_str());
        }

        println!("\n[{}/{}] cargo {}", index + 1, FEATURE_COMBINATIONS.len(), args.join(" "));

        let status = Command::new("cargo")
            .args(&args)
            .status()
            .with_context(|| format!("Failed to run cargo test for '{}'", set.label))?;

        if !status.success() {
            anyhow::bail!("Feature combination '{}' failed", set.label);
        }

        println!("✅ Features '{}' passed", set.label);
    }

    println!("\n✅ All {} feature combinations pass!", FEATURE_COMBINATIONS.len());

    Ok(())
}
