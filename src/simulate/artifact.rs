use super::config::Config;
use crate::Action;
use crate::Reward;
use anyhow::Context;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;

/// the structured record of one run: the committed trace plus the
/// configuration that produced it, flattened into one object
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    pub actions: Vec<Action>,
    pub rewards: Vec<Reward>,
    pub state: Vec<Vec<f64>>,
    pub running_time: f64,
    pub date: String,
    #[serde(flatten)]
    pub config: Config,
}

impl Artifact {
    pub fn mean_reward(&self) -> Reward {
        match self.rewards.len() {
            0 => 0.,
            n => self.rewards.iter().sum::<Reward>() / n as Reward,
        }
    }

    /// write <out>/<environment>/<algorithm dir>/<seed>.json
    pub fn save(&self, out: &Path) -> Result<PathBuf> {
        let dir = out
            .join(&self.config.environment)
            .join(self.config.directory());
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create output directory {:?}", dir))?;
        let file = dir.join(format!("{}.json", self.config.seed.unwrap_or(0)));
        let json = serde_json::to_string_pretty(self).context("serialize artifact")?;
        std::fs::write(&file, json).with_context(|| format!("write artifact {:?}", file))?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulate::Algorithm;

    fn artifact() -> Artifact {
        let mut config = Config::new(Algorithm::Hoot, "test_function");
        config.seed = Some(3);
        Artifact {
            actions: vec![vec![0.5]],
            rewards: vec![1.],
            state: vec![vec![], vec![]],
            running_time: 0.1,
            date: "2026-01-01T00:00:00+00:00".to_string(),
            config,
        }
    }

    #[test]
    fn configuration_flattens_into_the_record() {
        let json = serde_json::to_value(artifact()).unwrap();
        assert!(json["algorithm"] == "hoot");
        assert!(json["environment"] == "test_function");
        assert!(json["seed"] == 3);
        assert!(json["gamma"] == 0.99);
        assert!(json["mode"] == "sample");
        assert!(json["actions"][0][0] == 0.5);
    }

    #[test]
    fn saves_one_file_per_seed() {
        let out = std::env::temp_dir().join("hoot-artifact-test");
        let _ = std::fs::remove_dir_all(&out);
        let path = artifact().save(&out).unwrap();
        assert!(path.ends_with("test_function/hoot/3.json"));
        assert!(path.exists());
        let _ = std::fs::remove_dir_all(&out);
    }

    #[test]
    fn mean_reward_handles_empty_traces() {
        let mut artifact = artifact();
        assert!(artifact.mean_reward() == 1.);
        artifact.rewards.clear();
        assert!(artifact.mean_reward() == 0.);
    }
}
