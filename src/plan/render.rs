//! Human-readable plan reports.

use std::fmt::Write;

use super::{NodeUpdateStep, PlatformUpdateStep, UpdatePlan, UpdateStep};

impl UpdatePlan {
    /// Three-section report: pre-platform node steps, the platform step,
    /// post-platform node steps.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let name = &self.platform.name;

        let _ = writeln!(out, "Pre-{name} update steps:");
        for step in &self.before_platform {
            render_step(&UpdateStep::Node(step), &mut out);
        }

        let _ = writeln!(out, "\n{name} update:");
        render_step(&UpdateStep::Platform(&self.platform), &mut out);

        let _ = writeln!(out, "\nPost-{name} update steps:");
        for step in &self.after_platform {
            render_step(&UpdateStep::Node(step), &mut out);
        }

        out
    }
}

fn render_step(step: &UpdateStep<'_>, out: &mut String) {
    match step {
        UpdateStep::Platform(platform) => render_platform(platform, out),
        UpdateStep::Node(node) => render_node(node, out),
    }
}

fn render_platform(step: &PlatformUpdateStep, out: &mut String) {
    let _ = match &step.error {
        Some(error) => writeln!(out, "  - {}: {} -> {}: {error}", step.name, step.from, step.to),
        None if step.from == step.to => {
            writeln!(out, "  - No {} update necessary", step.name)
        }
        None => writeln!(out, "  - {}: {} -> {}", step.name, step.from, step.to),
    };
}

fn render_node(step: &NodeUpdateStep, out: &mut String) {
    let _ = match &step.error {
        Some(error) => writeln!(out, "  - {}: {error}", step.from.nvr()),
        None if step.path.len() > 1 => {
            let hops: Vec<String> = step.path.iter().map(|n| format!("v{}", n.vr())).collect();
            writeln!(out, "  - Update {}: {}", step.from.name, hops.join(" -> "))
        }
        None => writeln!(out, "  - No update necessary for {}", step.from.nvr()),
    };
}
