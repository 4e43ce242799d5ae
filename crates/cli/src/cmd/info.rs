use anyhow::Result;
use serde::Serialize;

use raft_lib::platform::{Platform, host_platform, platforms};
use raft_lib::settings::settings_path;

use crate::output::{OutputFormat, print_json, print_stat};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlatformInfo {
  name: &'static str,
  generator: Option<&'static str>,
  architectures: Vec<ArchitectureInfo>,
}

#[derive(Serialize)]
struct ArchitectureInfo {
  name: &'static str,
  generator: Option<&'static str>,
}

impl From<&Platform> for PlatformInfo {
  fn from(platform: &Platform) -> Self {
    PlatformInfo {
      name: platform.name,
      generator: platform.generator_name(),
      architectures: platform
        .architectures()
        .iter()
        .map(|arch| ArchitectureInfo {
          name: arch.name,
          generator: arch.generator_override().or_else(|| platform.generator_name()),
        })
        .collect(),
    }
  }
}

pub fn cmd_info(output: OutputFormat) -> Result<()> {
  let infos: Vec<PlatformInfo> = platforms().iter().map(PlatformInfo::from).collect();

  if output.is_json() {
    return print_json(&infos);
  }

  println!("raft {}", env!("CARGO_PKG_VERSION"));
  print_stat("Settings", &settings_path().display().to_string());
  print_stat("Host platform", host_platform().name);
  println!();
  println!("Platforms:");
  for info in &infos {
    let names: Vec<&str> = info.architectures.iter().map(|arch| arch.name).collect();
    let generator = info
      .architectures
      .first()
      .and_then(|arch| arch.generator)
      .unwrap_or("cmake default");
    print_stat(info.name, &format!("{} [{}]", names.join(", "), generator));
  }

  Ok(())
}
