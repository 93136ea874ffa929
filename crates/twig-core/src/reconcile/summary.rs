//! Human-readable rendering of pending effects and commit reports.

use super::{CommitReport, PropOp, ReconcileSession};
use crate::model::{Effect, EffectTag};

/// Render the effects queued in a session, deletions first as they will commit.
///
/// Informational only; intended for debugging output and test failure messages.
pub fn render_effect_summary(session: &ReconcileSession) -> String {
    let mut out = String::new();

    out.push_str(&format!("## Pending Effects ({})\n\n", session.id()));

    if session.is_empty() {
        out.push_str("_No pending effects._\n");
        return out;
    }

    out.push_str(&format!(
        "| Placement | Update | Deletion |\n|---|---|---|\n| {} | {} | {} |\n\n",
        session.count(EffectTag::Placement),
        session.count(EffectTag::Update),
        session.count(EffectTag::Deletion),
    ));

    if !session.deletions().is_empty() {
        out.push_str("### Deletions\n\n");
        for effect in session.deletions() {
            out.push_str(&format!("- {}\n", describe(effect)));
        }
        out.push('\n');
    }

    if !session.effects().is_empty() {
        out.push_str("### Placements and Updates\n\n");
        for effect in session.effects() {
            out.push_str(&format!("- {}\n", describe(effect)));
            for op in &effect.ops {
                out.push_str(&format!("  - {}\n", describe_op(op)));
            }
        }
        out.push('\n');
    }

    out
}

/// Render the outcome of one commit.
pub fn render_commit_summary(report: &CommitReport) -> String {
    let mut out = format!(
        "Committed {} effect(s): {} deletion(s), {} placement(s), {} update(s)",
        report.applied(),
        report.deletions,
        report.placements,
        report.updates
    );
    if report.skipped > 0 {
        out.push_str(&format!("; **{} skipped**", report.skipped));
    }
    out.push('\n');
    out
}

fn describe(effect: &Effect) -> String {
    let subject = effect
        .new
        .as_ref()
        .or(effect.old.as_ref())
        .map(|n| format!(" `{}`", n.kind))
        .unwrap_or_default();
    let mut line = format!("**{}** {}{}", effect.tag, effect.target, subject);
    if let Some(parent) = effect.parent {
        line.push_str(&format!(" under {}", parent));
    }
    if let Some(replaced) = effect.replaces {
        line.push_str(&format!(" replacing {}", replaced));
    } else if let Some(before) = effect.before {
        line.push_str(&format!(" before {}", before));
    }
    line
}

fn describe_op(op: &PropOp) -> String {
    match op {
        PropOp::SetAttribute { name, value } => format!("set `{}` = {:?}", name, value),
        PropOp::RemoveAttribute { name } => format!("remove `{}`", name),
        PropOp::SetProperty { name, value } => format!("property `{}` = {:?}", name, value),
        PropOp::SetStyleText { css } => format!("style = {:?}", css),
        PropOp::ClearStyleText => "clear style text".to_string(),
        PropOp::SetStyleField { name, value } => format!("style.{} = {:?}", name, value),
        PropOp::RemoveStyleField { name } => format!("remove style.{}", name),
        PropOp::AddListener { event, .. } => format!("listen `{}`", event),
        PropOp::RemoveListener { event, .. } => format!("unlisten `{}`", event),
        PropOp::SetInnerHtml { .. } => "replace inner html".to_string(),
        PropOp::AssignRef(_) => "assign ref".to_string(),
        PropOp::ClearRef(_) => "clear ref".to_string(),
        PropOp::SetText { content } => format!("text = {:?}", content),
    }
}
