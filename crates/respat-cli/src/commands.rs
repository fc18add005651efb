use anyhow::{Context, Result};
use comfy_table::Table;
use serde::Serialize;

use respat_cli::pipeline::{JobConfig, run_job};
use respat_cli::types::JobResult;
use respat_core::{CtRescale, default_registry};
use respat_model::{AgePolicy, LabId, TextEncoding, UnknownLayoutPolicy};

use crate::cli::{JobArgs, LabsArgs};
use crate::summary::{apply_table_style, header_cell};

pub fn run_lab_job(lab: LabId, args: &JobArgs) -> Result<JobResult> {
    let config = JobConfig {
        lab,
        datadir: args.datadir.clone(),
        rename: args.rename.clone(),
        correction: args.correction.clone(),
        cache: args.cache.clone(),
        output: args.output.clone(),
        ct: CtRescale::from(&args.ct),
    };
    run_job(&config)
}

#[derive(Serialize)]
struct LabInfo {
    lab: LabId,
    command: &'static str,
    directory: &'static str,
    layouts: &'static [&'static str],
    sample_id_len: usize,
    age_policy: AgePolicy,
    encoding: TextEncoding,
    unknown_layout: UnknownLayoutPolicy,
}

fn lab_infos() -> Result<Vec<LabInfo>> {
    let registry = default_registry();
    LabId::ALL
        .iter()
        .map(|&lab| -> Result<LabInfo> {
            let processor = registry.get(lab)?;
            Ok(LabInfo {
                lab,
                command: lab.slug(),
                directory: lab.as_str(),
                layouts: processor.layouts(),
                sample_id_len: lab.sample_id_len(),
                age_policy: lab.age_policy(),
                encoding: lab.encoding(),
                unknown_layout: lab.unknown_layout_policy(),
            })
        })
        .collect()
}

pub fn run_labs(args: &LabsArgs) -> Result<()> {
    let infos = lab_infos()?;
    if args.json {
        let text = serde_json::to_string_pretty(&infos).context("serialize lab list")?;
        println!("{text}");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Command"),
        header_cell("Directory"),
        header_cell("Layouts"),
        header_cell("Sample id"),
        header_cell("Age"),
        header_cell("Encoding"),
        header_cell("Unknown layout"),
    ]);
    apply_table_style(&mut table);
    for info in infos {
        table.add_row(vec![
            info.command.to_string(),
            info.directory.to_string(),
            info.layouts.join(", "),
            format!("{} hex", info.sample_id_len),
            info.age_policy.to_string(),
            info.encoding.to_string(),
            info.unknown_layout.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
