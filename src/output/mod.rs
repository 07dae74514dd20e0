//! Writes everything derived from a finished fabric to disk.
//!
//! Layout:
//! - `{diagrams}/topology.dot` and `topology.svg` for the whole fabric
//! - `{diagrams}/{leaf}.dot` and `{leaf}.svg` per leaf
//! - `{configs}/{device}.txt` rendered device configs

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::Config;
use crate::fabric::Fabric;
use crate::graph::TopologyGraph;
use crate::render::ConfigRenderer;
use crate::utils::config_filename;

const TOPOLOGY_NAME: &str = "topology";

/// Outcome of one SVG conversion attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SvgStatus {
    Written,
    Failed,
    Unavailable,
}

/// OutputWriter places diagrams and configs under their directories
#[derive(Debug, Clone)]
pub struct OutputWriter {
    diagrams_dir: PathBuf,
    config_dir: PathBuf,
    dot_binary: String,
    render_svg: bool,
}

impl OutputWriter {
    pub fn new(config: &Config) -> Self {
        Self {
            diagrams_dir: PathBuf::from(&config.diagrams_dir),
            config_dir: PathBuf::from(&config.config_dir),
            dot_binary: config.dot_binary.clone(),
            render_svg: config.render_svg,
        }
    }

    /// Write DOT for the topology and every leaf, plus SVG when Graphviz
    /// is available. Returns the paths written.
    pub async fn write_diagrams(&self, fabric: &Fabric) -> Result<Vec<PathBuf>> {
        tokio::fs::create_dir_all(&self.diagrams_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.diagrams_dir.display()))?;

        let graph = TopologyGraph::new(fabric);
        let mut views = vec![(TOPOLOGY_NAME.to_string(), graph.topology())];
        views.extend(graph.leaf_views());

        let mut written = Vec::new();
        let mut svg_enabled = self.render_svg;
        for (name, view) in &views {
            let dot = view.to_dot();
            let dot_path = self.diagrams_dir.join(format!("{}.dot", name));
            write_file(&dot_path, &dot).await?;
            written.push(dot_path);

            if !svg_enabled {
                continue;
            }
            let svg_path = self.diagrams_dir.join(format!("{}.svg", name));
            match self.render_svg_file(&dot, &svg_path).await {
                SvgStatus::Written => written.push(svg_path),
                SvgStatus::Failed => {}
                SvgStatus::Unavailable => svg_enabled = false,
            }
        }

        tracing::info!(
            "Wrote {} diagram files for {} to {}",
            written.len(),
            fabric.name(),
            self.diagrams_dir.display()
        );
        Ok(written)
    }

    /// Render one config file per device
    pub async fn write_configs(&self, fabric: &Fabric, renderer: &ConfigRenderer) -> Result<Vec<PathBuf>> {
        tokio::fs::create_dir_all(&self.config_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.config_dir.display()))?;

        let mut written = Vec::new();
        for device in fabric.devices() {
            let content = renderer.render(device)?;
            let path = self.config_dir.join(config_filename(device.name()));
            write_file(&path, &content).await?;
            written.push(path);
        }

        tracing::info!("Wrote {} device configs to {}", written.len(), self.config_dir.display());
        Ok(written)
    }

    /// Dump the fabric as pretty JSON
    pub async fn write_json(&self, fabric: &Fabric, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let mut json = serde_json::to_string_pretty(fabric).context("Failed to serialize fabric")?;
        json.push('\n');
        write_file(path, &json).await?;
        tracing::info!("Wrote fabric JSON to {}", path.display());
        Ok(())
    }

    /// Pipe DOT text through Graphviz into an SVG file
    async fn render_svg_file(&self, dot: &str, svg_path: &Path) -> SvgStatus {
        let child = Command::new(&self.dot_binary)
            .arg("-Tsvg")
            .arg("-o")
            .arg(svg_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let mut child = match child {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(
                    "Graphviz '{}' not available ({}), writing DOT files only",
                    self.dot_binary,
                    e
                );
                return SvgStatus::Unavailable;
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(dot.as_bytes()).await {
                tracing::warn!("Failed to send DOT to {}: {}", self.dot_binary, e);
            }
        }

        match child.wait_with_output().await {
            Ok(output) if output.status.success() => SvgStatus::Written,
            Ok(output) => {
                tracing::warn!(
                    "{} failed for {}: {}",
                    self.dot_binary,
                    svg_path.display(),
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                SvgStatus::Failed
            }
            Err(e) => {
                tracing::warn!("Failed to wait for {}: {}", self.dot_binary, e);
                SvgStatus::Failed
            }
        }
    }
}

async fn write_file(path: &Path, content: &str) -> Result<()> {
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
