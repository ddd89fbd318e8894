//! Static corpora and on-disk fixture roots used across harnesses.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A genuine correlation id, hyphenated.
pub const TRACE_A: &str = "3f2c9a1e-5b7d-4c8e-9a0b-1c2d3e4f5a6b";
/// A second genuine id, used for the failing workspace call.
pub const TRACE_B: &str = "0a0b0c0d-1111-2222-3333-444455556666";
/// A long alphanumeric raw-file suffix that is not id-shaped.
pub const KEY_C: &str = "Q7w8E9r0T1y2U3i4O5p6A7";

/// `TRACE_A` the way it shows up inside raw file names.
pub fn underscored(id: &str) -> String {
    id.replace('-', "_")
}

/// A day of integration logging: two traced calls, noise, and untraced lines.
pub fn corpus_app_log() -> Vec<String> {
    vec![
        "2025-01-01 12:00:00.000 [INFO] Application started".to_string(),
        format!("2025-01-01 12:00:01.000 [INFO] Calling masterdata for BUS2038001_004711 OTCS.TraceLogID: {TRACE_A}"),
        format!("2025-01-01 12:00:01.250 [DEBUG] Raw log saved: 20250101120001_outbound_masterdata_request_{}.txt", underscored(TRACE_A)),
        format!("2025-01-01 12:00:02.750 [INFO] Response received for {TRACE_A}"),
        "   at Otcs.Client.Send() in Client.cs:line 88".to_string(),
        format!("2025-01-01 12:05:00.000 [INFO] Creating workspace {TRACE_B}"),
        format!("2025-01-01 12:05:03.000 [ERROR] Workspace creation failed for {TRACE_B}"),
        "2025-01-01 12:06:00.000 [INFO] Got OTCSTicket for service user".to_string(),
        "2025-01-01 12:06:00".to_string(),
    ]
}

// ---------------------------------------------------------------------------
// On-disk fixture root
// ---------------------------------------------------------------------------

/// A temp directory laid out like the integration's log root.
pub struct FixtureRoot {
    dir: TempDir,
}

impl FixtureRoot {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        std::fs::create_dir_all(path.parent().expect("fixture path has a parent"))
            .expect("create fixture dirs");
        std::fs::write(&path, contents).expect("write fixture file");
        path
    }

    pub fn log(&self, name: &str, lines: &[String]) -> &Self {
        self.write(name, &(lines.join("\n") + "\n"));
        self
    }

    pub fn inbound(&self, name: &str) -> &Self {
        self.write(&format!("Raw/Inbound/{name}"), "{}");
        self
    }

    pub fn outbound(&self, name: &str) -> &Self {
        self.write(&format!("Raw/Outbound/{name}"), "{}");
        self
    }

    pub fn map(&self, name: &str) -> &Self {
        self.write(&format!("Raw/Maps/{name}"), "step 1: sent\nstep 2: received\n");
        self
    }
}

/// The standard scenario: the app log plus raw artifacts for every flavour of
/// correlation (real id, long suffix, NoTrace) and two map files.
pub fn sample_root() -> FixtureRoot {
    let root = FixtureRoot::new();
    root.log("integration.log", &corpus_app_log())
        .outbound(&format!("20250101120001_outbound_masterdata_request_{}.txt", underscored(TRACE_A)))
        .outbound(&format!("20250101120002_outbound_masterdata_response_{}.txt", underscored(TRACE_A)))
        .inbound(&format!("20250101130000_inbound_classification_request_BUS2038001_004712_{KEY_C}.txt"))
        .inbound(&format!("20250101130001_inbound_classification_response_{KEY_C}.txt"))
        .outbound("20250101140000_outbound_masterdata_NoTrace_abc123.txt")
        .outbound("20250101150000_outbound_search_NoTrace_def456.txt")
        .map(&format!("Map_{}.txt", underscored(TRACE_A)))
        .map("Map_NoTrace_20250101140000.txt");
    root
}
