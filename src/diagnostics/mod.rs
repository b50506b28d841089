//! Deployment diagnostics for the gateway. Each check produces a section of
//! status lines; the orchestrator always runs every check in a fixed order
//! and renders the collected report at the end, so no single failure can
//! suppress the rest. The report is advisory: findings live in the text, not
//! in the exit code.

pub mod checks;
pub mod host_config;

use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Fail,
    Info,
}

#[derive(Debug, Clone)]
pub struct CheckLine {
    pub status: CheckStatus,
    pub message: String,
}

impl CheckLine {
    pub fn pass(message: impl Into<String>) -> Self {
        Self { status: CheckStatus::Pass, message: message.into() }
    }
    pub fn fail(message: impl Into<String>) -> Self {
        Self { status: CheckStatus::Fail, message: message.into() }
    }
    pub fn info(message: impl Into<String>) -> Self {
        Self { status: CheckStatus::Info, message: message.into() }
    }
}

#[derive(Debug, Clone)]
pub struct CheckSection {
    pub title: &'static str,
    pub lines: Vec<CheckLine>,
}

impl CheckSection {
    pub fn new(title: &'static str) -> Self {
        Self { title, lines: Vec::new() }
    }

    pub fn push_pass(&mut self, message: impl Into<String>) {
        self.lines.push(CheckLine::pass(message));
    }
    pub fn push_fail(&mut self, message: impl Into<String>) {
        self.lines.push(CheckLine::fail(message));
    }
    pub fn push_info(&mut self, message: impl Into<String>) {
        self.lines.push(CheckLine::info(message));
    }

    pub fn failed(&self) -> bool {
        self.lines.iter().any(|l| l.status == CheckStatus::Fail)
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub sections: Vec<CheckSection>,
    pub generated_at: chrono::DateTime<chrono::Local>,
}

impl Report {
    pub fn failures(&self) -> usize {
        self.sections.iter().filter(|s| s.failed()).count()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("🔧 PubMed MCP Gateway Diagnostics\n");
        out.push_str(&format!(
            "Generated: {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(&"=".repeat(50));
        out.push('\n');

        for section in &self.sections {
            out.push('\n');
            out.push_str(section.title);
            out.push('\n');
            for line in &section.lines {
                match line.status {
                    CheckStatus::Pass => out.push_str(&format!("✅ {}\n", line.message)),
                    CheckStatus::Fail => out.push_str(&format!("❌ {}\n", line.message)),
                    CheckStatus::Info => out.push_str(&format!("{}\n", line.message)),
                }
            }
        }

        out.push('\n');
        out.push_str(&"=".repeat(50));
        out.push('\n');
        let failures = self.failures();
        if failures == 0 {
            out.push_str("Diagnostic complete! All checks passed.\n");
            out.push_str("\nIf the host application still cannot reach the gateway, try restarting it.\n");
        } else {
            out.push_str(&format!(
                "Diagnostic complete! {failures} check(s) reported problems.\n"
            ));
            out.push_str("\nPlease fix the failed checks above, then run the diagnostics again.\n");
        }
        out
    }
}

/// Where the diagnostics look: the deployment root, the gateway executable,
/// and the host application's own config file. Separated from detection so
/// tests can point the checks at fixtures.
#[derive(Debug, Clone)]
pub struct DoctorEnv {
    pub root: PathBuf,
    pub exe: Option<PathBuf>,
    pub host_config_path: Option<PathBuf>,
}

impl DoctorEnv {
    pub fn detect() -> Self {
        Self {
            root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            exe: std::env::current_exe().ok(),
            host_config_path: host_config::default_path(),
        }
    }
}

/// Run all checks in their fixed order.
pub fn run(env: &DoctorEnv) -> Report {
    Report {
        sections: vec![
            checks::runtime_environment(env),
            checks::file_structure(env),
            checks::env_configuration(env),
            checks::launch_probe(env),
            checks::tool_registry(),
            checks::host_configuration(env),
        ],
        generated_at: chrono::Local::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_track_failures() {
        let mut s = CheckSection::new("t");
        s.push_pass("ok");
        assert!(!s.failed());
        s.push_fail("broken");
        assert!(s.failed());
    }

    #[test]
    fn render_marks_pass_fail_and_leaves_info_bare() {
        let mut s = CheckSection::new("📁 File Structure");
        s.push_pass("present");
        s.push_fail("missing");
        s.push_info("just a note");
        let report = Report {
            sections: vec![s],
            generated_at: chrono::Local::now(),
        };
        let text = report.render();
        assert!(text.contains("✅ present"));
        assert!(text.contains("❌ missing"));
        assert!(text.contains("\njust a note\n"));
        assert!(text.contains("1 check(s) reported problems"));
    }

    #[test]
    fn clean_report_renders_all_passed() {
        let report = Report {
            sections: vec![CheckSection::new("t")],
            generated_at: chrono::Local::now(),
        };
        assert!(report.render().contains("All checks passed"));
    }
}
