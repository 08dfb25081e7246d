//! # Lifecycle Subcommand
//!
//! Prints the contract status lifecycle: every status with its label,
//! progress, successor, and whether it can be revoked or edited. With
//! `--status`, prints one status together with its valid transitions.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use clm_state::{ContractStatus, StatusPresentation};

/// Arguments for the `clm lifecycle` subcommand.
#[derive(Args, Debug)]
pub struct LifecycleArgs {
    /// Show only this status (created, approved, sent, signed, locked, revoked).
    #[arg(long)]
    pub status: Option<ContractStatus>,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    #[serde(flatten)]
    presentation: StatusPresentation,
    valid_transitions: Vec<ContractStatus>,
}

impl StatusReport {
    fn of(status: ContractStatus) -> Self {
        Self {
            presentation: StatusPresentation::of(status),
            valid_transitions: status.valid_transitions(),
        }
    }
}

/// Execute the lifecycle subcommand.
pub fn run_lifecycle(args: &LifecycleArgs) -> Result<u8> {
    print!("{}", render(args)?);
    Ok(0)
}

fn render(args: &LifecycleArgs) -> Result<String> {
    let statuses: Vec<ContractStatus> = match args.status {
        Some(status) => vec![status],
        None => ContractStatus::ALL.to_vec(),
    };
    let reports: Vec<StatusReport> = statuses.into_iter().map(StatusReport::of).collect();

    if args.json {
        let json = match args.status {
            Some(_) => serde_json::to_string_pretty(&reports[0])?,
            None => serde_json::to_string_pretty(&reports)?,
        };
        return Ok(format!("{json}\n"));
    }

    let mut out = format!(
        "{:<10} {:<10} {:>8}  {:<10} {:<7} {:<8} {}\n",
        "STATUS", "LABEL", "PROGRESS", "NEXT", "REVOKE", "EDITABLE", "TRANSITIONS"
    );
    for report in &reports {
        let p = &report.presentation;
        let next = p.next_status.map(|s| s.as_str()).unwrap_or("-");
        let transitions = if report.valid_transitions.is_empty() {
            "-".to_string()
        } else {
            report
                .valid_transitions
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(",")
        };
        out.push_str(&format!(
            "{:<10} {:<10} {:>7.0}%  {:<10} {:<7} {:<8} {}\n",
            p.status.as_str(),
            p.label,
            p.progress,
            next,
            yes_no(p.can_revoke),
            yes_no(p.editable),
            transitions,
        ));
    }
    Ok(out)
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_a_row_per_status() {
        let out = render(&LifecycleArgs {
            status: None,
            json: false,
        })
        .unwrap();
        assert_eq!(out.lines().count(), 1 + ContractStatus::ALL.len());
        let sent = out.lines().find(|l| l.starts_with("sent")).unwrap();
        assert!(sent.contains("60%"));
        assert!(sent.contains("signed,revoked"));
    }

    #[test]
    fn json_for_one_status() {
        let out = render(&LifecycleArgs {
            status: Some(ContractStatus::Locked),
            json: true,
        })
        .unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["status"], "locked");
        assert!(v["next_status"].is_null());
        assert_eq!(v["can_revoke"], false);
        assert_eq!(v["valid_transitions"], serde_json::json!([]));
    }

    #[test]
    fn json_table_lists_all() {
        let out = render(&LifecycleArgs {
            status: None,
            json: true,
        })
        .unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v.as_array().unwrap().len(), 6);
    }
}
