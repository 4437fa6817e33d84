//! Release pipeline
//!
//! Stages run strictly in order: lint gate, version bump, payload hash,
//! release notes, git publish, registry announcement. The gate and every
//! local stage abort the run on failure; the git and registry stages
//! downgrade their failures to warnings so the local release survives.

use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use modship_core::config::{Config, ProjectPaths};
use modship_core::error::{Result, WorkflowError};
use modship_core::walker::normalize;
use modship_core::workflow::{format_commit_message, format_tag, resolve_architecture};
use modship_core::{
    BumpKind, FileSet, IntegrityHasher, ModuleMetadata, ReleaseDigest, ReleaseNotes,
    ReleaseNotesWriter, ReleaseOptions, ReleaseSummary, StageOutcome, VersionBump, VersionBumper,
};
use modship_git::{PushOutcome, VcsPublisher};
use modship_lint::{LintReport, PatternLinter};
use modship_registry::{Registrar, Registration};

use crate::cli::output;

/// A collaborator that could be opened, or the reason it could not
pub type Collaborator<T> = std::result::Result<T, String>;

/// Local results of a release, handed to the remote stages
#[derive(Debug, Clone)]
pub struct PreparedRelease {
    pub metadata: ModuleMetadata,
    pub bump: VersionBump,
    pub tag: String,
    pub digest: ReleaseDigest,
    pub architecture: String,
}

/// One release run over a project
pub struct Pipeline<'a> {
    config: &'a Config,
    paths: &'a ProjectPaths,
    options: ReleaseOptions,
    today: NaiveDate,
    quiet: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config, paths: &'a ProjectPaths, options: ReleaseOptions) -> Self {
        Self {
            config,
            paths,
            options,
            today: chrono::Local::now().date_naive(),
            quiet: false,
        }
    }

    /// Suppress stage markers on stdout; violations still go to stderr
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Date stamped into the release notes
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.today = date;
        self
    }

    /// Run every stage and return the final summary
    #[instrument(skip_all, fields(root = %self.paths.root.display(), simulate = self.options.simulate))]
    pub async fn run(
        &self,
        vcs: Collaborator<&mut dyn VcsPublisher>,
        registrar: Collaborator<&dyn Registrar>,
    ) -> Result<ReleaseSummary> {
        if self.options.simulate {
            self.info("Simulated run: nothing will be written, committed or sent");
        }

        self.lint_gate()?;
        let release = self.prepare()?;

        let mut summary = ReleaseSummary {
            module: release.metadata.slug().to_string(),
            previous_version: release.bump.previous.clone(),
            version: release.bump.next.clone(),
            tag: release.tag.clone(),
            hash: release.digest.hex.clone(),
            simulated: self.options.simulate,
            vcs: StageOutcome::Skipped("not run".to_string()),
            registration: StageOutcome::Skipped("not run".to_string()),
            warnings: Vec::new(),
        };
        for file in &release.digest.skipped {
            summary.add_warning(format!("{} could not be read and was left out of the hash", file));
        }

        let vcs_outcome = self.publish(vcs, &release, &mut summary);
        summary.vcs = vcs_outcome;

        let registration = self.register(registrar, &release, &mut summary).await;
        summary.registration = registration;

        info!(
            module = %summary.module,
            version = %summary.version,
            hash = %summary.hash,
            vcs = %summary.vcs,
            registration = %summary.registration,
            "release finished"
        );
        Ok(summary)
    }

    /// Abort the run when any rule fires
    pub fn lint_gate(&self) -> Result<Option<LintReport>> {
        if !self.config.lint.enabled {
            self.info("Lint gate disabled in configuration");
            return Ok(None);
        }

        let linter = PatternLinter::new(&self.config.lint)?;
        let report = linter.lint_tree(self.paths);

        for file in &report.unreadable {
            self.warning(&format!("Could not read {}", file.display()));
        }

        if !report.passed() {
            for violation in &report.violations {
                output::violation(violation);
            }
            return Err(WorkflowError::GateFailed {
                violations: report.violations.len(),
            }
            .into());
        }

        self.success(&format!(
            "Lint passed ({} files checked)",
            report.files_checked
        ));
        Ok(Some(report))
    }

    /// Bump the version, hash the payload and render the notes
    pub fn prepare(&self) -> Result<PreparedRelease> {
        let bumper = VersionBumper::new(self.config);
        let metadata_path = &self.paths.metadata;
        let files = FileSet::collect(self.paths);

        let (metadata, bump, digest) = if self.options.simulate {
            let current = ModuleMetadata::load(metadata_path)?;
            let (updated, bump) = bumper.bump(&current)?;
            self.simulated(&format!(
                "write {}: version {} → {}",
                self.relative(metadata_path),
                bump.previous,
                bump.next
            ));

            // Hash the bytes a real run would have written
            let digest = IntegrityHasher::new()
                .with_override(self.relative(metadata_path), updated.to_pretty_json()?)
                .hash(&files)?;
            (updated, bump, digest)
        } else {
            let (updated, bump) = bumper.bump_file(metadata_path)?;
            self.success(&format!(
                "Version bumped {} → {}",
                bump.previous,
                output::version_style().apply_to(&bump.next)
            ));
            let digest = IntegrityHasher::new().hash(&files)?;
            (updated, bump, digest)
        };

        if bump.kind == BumpKind::Fallback {
            self.warning(&format!(
                "Version '{}' is not a dotted triple, appended .1",
                bump.previous
            ));
        }
        for file in &digest.skipped {
            self.warning(&format!("Skipped unreadable file {} while hashing", file));
        }
        self.success(&format!(
            "Integrity hash {} ({} files)",
            digest.hex, digest.files_hashed
        ));

        let architecture = resolve_architecture(self.config, metadata.architecture()).to_string();
        let notes = ReleaseNotes {
            version: &bump.next,
            digest: &digest.hex,
            date: self.today,
            architecture: &architecture,
        };
        let notes_path = &self.paths.release_notes;
        if self.options.simulate {
            self.simulated(&format!("write {}", self.relative(notes_path)));
        } else {
            ReleaseNotesWriter::new(self.config).write(notes_path, &notes)?;
            self.success(&format!(
                "Release notes written to {}",
                output::path_style().apply_to(self.relative(notes_path))
            ));
        }

        let tag = format_tag(self.config, &bump.next);
        Ok(PreparedRelease {
            metadata,
            bump,
            tag,
            digest,
            architecture,
        })
    }

    /// Stage, commit, tag and push
    pub fn publish(
        &self,
        vcs: Collaborator<&mut dyn VcsPublisher>,
        release: &PreparedRelease,
        summary: &mut ReleaseSummary,
    ) -> StageOutcome {
        if self.options.skip_git {
            return StageOutcome::Skipped("--no-git".to_string());
        }
        if !self.config.git.enabled {
            return StageOutcome::Skipped("disabled in configuration".to_string());
        }

        let git = &self.config.git;
        let message = format_commit_message(
            self.config,
            &release.bump.next,
            release.metadata.slug(),
            &release.architecture,
        );

        if self.options.simulate {
            self.simulated("git add -A");
            self.simulated(&format!("git commit -m \"{}\"", message));
            self.simulated(&format!("git tag {}", release.tag));
            if git.push {
                self.simulated(&format!("git push {} HEAD --tags", git.remote));
            }
            return StageOutcome::Simulated;
        }

        let vcs = match vcs {
            Ok(vcs) => vcs,
            Err(reason) => {
                warn!(reason = %reason, "git unavailable");
                self.downgrade(summary, format!("Git unavailable: {}", reason));
                return StageOutcome::Failed(reason);
            }
        };

        if let Err(e) = commit_and_tag(vcs, &message, &release.tag) {
            warn!(error = %e, "git commit/tag failed");
            self.downgrade(summary, format!("Git commit/tag failed: {}", e));
            return StageOutcome::Failed(e.to_string());
        }
        self.success(&format!(
            "Committed and tagged {}",
            output::tag_style().apply_to(&release.tag)
        ));

        if !git.push {
            self.info("Push disabled in configuration");
            return StageOutcome::Done;
        }

        match vcs.push() {
            Ok(PushOutcome::Pushed { remote }) => {
                self.success(&format!("Pushed to {}", remote));
                StageOutcome::Done
            }
            Ok(PushOutcome::NoRemote { remote }) => {
                self.downgrade(
                    summary,
                    format!("Remote '{}' not found, committed and tagged locally", remote),
                );
                StageOutcome::Done
            }
            Err(e) => {
                warn!(error = %e, "push failed");
                self.downgrade(
                    summary,
                    format!("Push failed, committed and tagged locally: {}", e),
                );
                StageOutcome::Failed(e.to_string())
            }
        }
    }

    /// Announce the release; never fails the run
    pub async fn register(
        &self,
        registrar: Collaborator<&dyn Registrar>,
        release: &PreparedRelease,
        summary: &mut ReleaseSummary,
    ) -> StageOutcome {
        if self.options.skip_register {
            return StageOutcome::Skipped("--no-register".to_string());
        }
        if !self.config.registry.enabled {
            return StageOutcome::Skipped("disabled in configuration".to_string());
        }
        if matches!(summary.vcs, StageOutcome::Failed(_)) {
            self.downgrade(summary, "Git stage failed, registration skipped".to_string());
            return StageOutcome::Skipped("git stage failed".to_string());
        }

        let registrar = match registrar {
            Ok(registrar) => registrar,
            Err(reason) => {
                self.downgrade(summary, format!("Registry client unavailable: {}", reason));
                return StageOutcome::Failed(reason);
            }
        };

        if !registrar.is_available() {
            self.downgrade(
                summary,
                "Registry credentials missing, registration skipped".to_string(),
            );
            return StageOutcome::Skipped("credentials missing".to_string());
        }

        let registration = Registration::new(
            release.metadata.slug(),
            &release.bump.next,
            &release.digest.hex,
        );

        if self.options.simulate {
            let payload = serde_json::to_string(&registration).unwrap_or_default();
            self.simulated(&format!(
                "POST {} {} (basic auth ***)",
                registrar.endpoint(),
                payload
            ));
            return StageOutcome::Simulated;
        }

        self.info(&format!(
            "Registering with {} at {}",
            registrar.name(),
            registrar.endpoint()
        ));
        match registrar.register(&registration).await {
            Ok(receipt) => {
                self.success(&format!("Registered (HTTP {})", receipt.status));
                StageOutcome::Done
            }
            Err(e) => {
                warn!(error = %e, "registration failed");
                self.downgrade(summary, format!("Registration failed: {}", e));
                StageOutcome::Failed(e.to_string())
            }
        }
    }

    fn relative(&self, path: &Path) -> String {
        normalize(path.strip_prefix(&self.paths.root).unwrap_or(path))
    }

    fn downgrade(&self, summary: &mut ReleaseSummary, message: String) {
        self.warning(&message);
        summary.add_warning(message);
    }

    fn success(&self, message: &str) {
        if !self.quiet {
            output::success(message);
        }
    }

    fn warning(&self, message: &str) {
        if !self.quiet {
            output::warning(message);
        }
    }

    fn info(&self, message: &str) {
        if !self.quiet {
            output::info(message);
        }
    }

    fn simulated(&self, message: &str) {
        if !self.quiet {
            output::simulate(message);
        }
    }
}

fn commit_and_tag(
    vcs: &mut dyn VcsPublisher,
    message: &str,
    tag: &str,
) -> modship_git::Result<()> {
    vcs.stage_all()?;
    vcs.commit(message)?;
    vcs.tag(tag)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use modship_core::error::{GitError, ModshipError};
    use modship_registry::{
        Credentials, RegistrationReceipt, RegistryClient, RegistryError,
    };
    use std::sync::Mutex;
    use tempfile::TempDir;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct RecordingPublisher {
        calls: Vec<String>,
        push_outcome: Option<PushOutcome>,
        fail_commit: bool,
    }

    impl VcsPublisher for RecordingPublisher {
        fn stage_all(&mut self) -> modship_git::Result<()> {
            self.calls.push("stage_all".to_string());
            Ok(())
        }

        fn commit(&mut self, message: &str) -> modship_git::Result<()> {
            self.calls.push(format!("commit {}", message));
            if self.fail_commit {
                return Err(GitError::NothingToCommit);
            }
            Ok(())
        }

        fn tag(&mut self, name: &str) -> modship_git::Result<()> {
            self.calls.push(format!("tag {}", name));
            Ok(())
        }

        fn push(&mut self) -> modship_git::Result<PushOutcome> {
            self.calls.push("push".to_string());
            Ok(self.push_outcome.clone().unwrap_or(PushOutcome::Pushed {
                remote: "origin".to_string(),
            }))
        }
    }

    struct FakeRegistrar {
        available: bool,
        fail: bool,
        seen: Mutex<Vec<Registration>>,
    }

    impl FakeRegistrar {
        fn new(available: bool, fail: bool) -> Self {
            Self {
                available,
                fail,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl Registrar for FakeRegistrar {
        fn name(&self) -> &str {
            "fake"
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn endpoint(&self) -> &str {
            "https://registry.example/api/v1/register"
        }

        async fn register(
            &self,
            registration: &Registration,
        ) -> modship_registry::Result<RegistrationReceipt> {
            self.seen.lock().unwrap().push(registration.clone());
            if self.fail {
                return Err(RegistryError::Timeout(10));
            }
            Ok(RegistrationReceipt {
                status: 200,
                body: "{}".to_string(),
            })
        }
    }

    const METADATA: &str =
        "{\"slug\": \"kiw-forms\", \"version\": \"1.2.3\", \"system\": {\"architecture\": \"v1.1.2\"}}";

    fn project(plugin_source: &str) -> (TempDir, Config, ProjectPaths) {
        let temp = TempDir::new().unwrap();
        let config = Config::default();
        let paths = config.paths.resolve(temp.path());
        std::fs::create_dir_all(paths.source_dir.join("Admin")).unwrap();
        std::fs::write(&paths.metadata, METADATA).unwrap();
        std::fs::write(paths.source_dir.join("Admin/Page.php"), plugin_source).unwrap();
        (temp, config, paths)
    }

    const CLEAN_SOURCE: &str = "<?php\necho esc_html($title);\n";

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn pipeline<'a>(
        config: &'a Config,
        paths: &'a ProjectPaths,
        options: ReleaseOptions,
    ) -> Pipeline<'a> {
        Pipeline::new(config, paths, options)
            .quiet(true)
            .with_date(date())
    }

    #[tokio::test]
    async fn test_full_release() {
        let (_temp, config, paths) = project(CLEAN_SOURCE);
        let mut vcs = RecordingPublisher::default();
        let registrar = FakeRegistrar::new(true, false);

        let summary = pipeline(&config, &paths, ReleaseOptions::default())
            .run(Ok(&mut vcs), Ok(&registrar))
            .await
            .unwrap();

        assert_eq!(summary.module, "kiw-forms");
        assert_eq!(summary.previous_version, "1.2.3");
        assert_eq!(summary.version, "1.2.4");
        assert_eq!(summary.tag, "v1.2.4");
        assert_eq!(summary.hash.len(), 64);
        assert_eq!(summary.vcs, StageOutcome::Done);
        assert_eq!(summary.registration, StageOutcome::Done);
        assert!(summary.warnings.is_empty());

        assert_eq!(
            vcs.calls,
            vec!["stage_all", "commit Release v1.2.4", "tag v1.2.4", "push"]
        );

        let saved = ModuleMetadata::load(&paths.metadata).unwrap();
        assert_eq!(saved.version(), "1.2.4");

        let notes = std::fs::read_to_string(&paths.release_notes).unwrap();
        assert!(notes.contains("1.2.4"));
        assert!(notes.contains(&summary.hash));
        assert!(notes.contains("2026-10-16"));
        assert!(notes.contains("v1.1.2"));

        let seen = registrar.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0],
            Registration::new("kiw-forms", "1.2.4", summary.hash.clone())
        );
    }

    #[tokio::test]
    async fn test_hash_reflects_bumped_metadata() {
        let (_temp, config, paths) = project(CLEAN_SOURCE);
        let mut vcs = RecordingPublisher::default();

        let summary = pipeline(&config, &paths, ReleaseOptions::default())
            .run(Ok(&mut vcs), Err("unused".to_string()))
            .await
            .unwrap();

        let recomputed = IntegrityHasher::new()
            .hash(&FileSet::collect(&paths))
            .unwrap();
        assert_eq!(summary.hash, recomputed.hex);
    }

    #[tokio::test]
    async fn test_simulate_mutates_nothing_and_predicts_digest() {
        let (_temp, config, paths) = project(CLEAN_SOURCE);
        let mut vcs = RecordingPublisher::default();
        let registrar = FakeRegistrar::new(true, false);

        let simulated = pipeline(&config, &paths, ReleaseOptions::simulate())
            .run(Ok(&mut vcs), Ok(&registrar))
            .await
            .unwrap();

        assert!(simulated.simulated);
        assert_eq!(simulated.version, "1.2.4");
        assert_eq!(simulated.vcs, StageOutcome::Simulated);
        assert_eq!(simulated.registration, StageOutcome::Simulated);
        assert!(vcs.calls.is_empty());
        assert!(registrar.seen.lock().unwrap().is_empty());
        assert_eq!(std::fs::read_to_string(&paths.metadata).unwrap(), METADATA);
        assert!(!paths.release_notes.exists());

        let mut vcs = RecordingPublisher::default();
        let real = pipeline(&config, &paths, ReleaseOptions::default())
            .run(Ok(&mut vcs), Ok(&registrar))
            .await
            .unwrap();
        assert_eq!(real.hash, simulated.hash);
    }

    #[tokio::test]
    async fn test_gate_failure_stops_before_any_mutation() {
        let (_temp, config, paths) =
            project("<?php\n$ch = curl_init($url);\n$name = $_POST['name'];\n");
        let mut vcs = RecordingPublisher::default();

        let err = pipeline(&config, &paths, ReleaseOptions::default())
            .run(Ok(&mut vcs), Err("unused".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ModshipError::Workflow(WorkflowError::GateFailed { violations: 2 })
        ));
        assert_eq!(std::fs::read_to_string(&paths.metadata).unwrap(), METADATA);
        assert!(!paths.release_notes.exists());
        assert!(vcs.calls.is_empty());
    }

    #[tokio::test]
    async fn test_gate_disabled() {
        let (_temp, mut config, paths) = project("<?php\n$ch = curl_init($url);\n");
        config.lint.enabled = false;
        let mut vcs = RecordingPublisher::default();

        let summary = pipeline(&config, &paths, ReleaseOptions::default())
            .run(Ok(&mut vcs), Err("unused".to_string()))
            .await
            .unwrap();
        assert_eq!(summary.version, "1.2.4");
    }

    #[tokio::test]
    async fn test_missing_metadata_is_fatal() {
        let (_temp, config, paths) = project(CLEAN_SOURCE);
        std::fs::remove_file(&paths.metadata).unwrap();
        let mut vcs = RecordingPublisher::default();

        let err = pipeline(&config, &paths, ReleaseOptions::default())
            .run(Ok(&mut vcs), Err("unused".to_string()))
            .await
            .unwrap_err();

        assert!(err.is_configuration());
        assert!(!paths.release_notes.exists());
        assert!(vcs.calls.is_empty());
    }

    #[tokio::test]
    async fn test_git_unavailable_keeps_local_release() {
        let (_temp, config, paths) = project(CLEAN_SOURCE);
        let registrar = FakeRegistrar::new(true, false);

        let summary = pipeline(&config, &paths, ReleaseOptions::default())
            .run(Err("not a git repository".to_string()), Ok(&registrar))
            .await
            .unwrap();

        assert_eq!(
            summary.vcs,
            StageOutcome::Failed("not a git repository".to_string())
        );
        assert_eq!(
            summary.registration,
            StageOutcome::Skipped("git stage failed".to_string())
        );
        assert!(registrar.seen.lock().unwrap().is_empty());
        assert_eq!(ModuleMetadata::load(&paths.metadata).unwrap().version(), "1.2.4");
        assert!(paths.release_notes.exists());
    }

    #[tokio::test]
    async fn test_commit_failure_is_downgraded() {
        let (_temp, config, paths) = project(CLEAN_SOURCE);
        let mut vcs = RecordingPublisher {
            fail_commit: true,
            ..Default::default()
        };

        let summary = pipeline(&config, &paths, ReleaseOptions::default())
            .run(Ok(&mut vcs), Err("unused".to_string()))
            .await
            .unwrap();

        assert!(matches!(summary.vcs, StageOutcome::Failed(_)));
        assert_eq!(vcs.calls, vec!["stage_all", "commit Release v1.2.4"]);
        assert_eq!(summary.warnings.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_remote_still_registers() {
        let (_temp, config, paths) = project(CLEAN_SOURCE);
        let mut vcs = RecordingPublisher {
            push_outcome: Some(PushOutcome::NoRemote {
                remote: "origin".to_string(),
            }),
            ..Default::default()
        };
        let registrar = FakeRegistrar::new(true, false);

        let summary = pipeline(&config, &paths, ReleaseOptions::default())
            .run(Ok(&mut vcs), Ok(&registrar))
            .await
            .unwrap();

        assert_eq!(summary.vcs, StageOutcome::Done);
        assert_eq!(summary.registration, StageOutcome::Done);
        assert_eq!(
            summary.warnings,
            vec!["Remote 'origin' not found, committed and tagged locally".to_string()]
        );
    }

    #[tokio::test]
    async fn test_push_disabled() {
        let (_temp, mut config, paths) = project(CLEAN_SOURCE);
        config.git.push = false;
        let mut vcs = RecordingPublisher::default();

        let summary = pipeline(&config, &paths, ReleaseOptions::default())
            .run(Ok(&mut vcs), Err("unused".to_string()))
            .await
            .unwrap();

        assert_eq!(summary.vcs, StageOutcome::Done);
        assert!(!vcs.calls.contains(&"push".to_string()));
    }

    #[tokio::test]
    async fn test_skip_flags() {
        let (_temp, config, paths) = project(CLEAN_SOURCE);
        let mut vcs = RecordingPublisher::default();
        let registrar = FakeRegistrar::new(true, false);
        let options = ReleaseOptions {
            skip_git: true,
            skip_register: true,
            ..Default::default()
        };

        let summary = pipeline(&config, &paths, options)
            .run(Ok(&mut vcs), Ok(&registrar))
            .await
            .unwrap();

        assert_eq!(summary.vcs, StageOutcome::Skipped("--no-git".to_string()));
        assert_eq!(
            summary.registration,
            StageOutcome::Skipped("--no-register".to_string())
        );
        assert!(vcs.calls.is_empty());
        assert!(registrar.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_credentials_skip_registration() {
        let (_temp, config, paths) = project(CLEAN_SOURCE);
        let mut vcs = RecordingPublisher::default();
        let registrar = FakeRegistrar::new(false, false);

        let summary = pipeline(&config, &paths, ReleaseOptions::default())
            .run(Ok(&mut vcs), Ok(&registrar))
            .await
            .unwrap();

        assert_eq!(
            summary.registration,
            StageOutcome::Skipped("credentials missing".to_string())
        );
        assert!(registrar.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_registration_failure_is_not_fatal() {
        let (_temp, config, paths) = project(CLEAN_SOURCE);
        let mut vcs = RecordingPublisher::default();
        let registrar = FakeRegistrar::new(true, true);

        let summary = pipeline(&config, &paths, ReleaseOptions::default())
            .run(Ok(&mut vcs), Ok(&registrar))
            .await
            .unwrap();

        assert!(matches!(summary.registration, StageOutcome::Failed(_)));
        assert_eq!(summary.version, "1.2.4");
        assert_eq!(summary.vcs, StageOutcome::Done);
    }

    #[tokio::test]
    async fn test_registration_against_http_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("registry down"))
            .expect(1)
            .mount(&server)
            .await;

        let (_temp, config, paths) = project(CLEAN_SOURCE);
        let client = RegistryClient::new(
            format!("{}/api/v1/register", server.uri()),
            5,
            Some(Credentials::new("acme", "pw")),
        )
        .unwrap();
        let mut vcs = RecordingPublisher::default();

        let summary = pipeline(&config, &paths, ReleaseOptions::default())
            .run(Ok(&mut vcs), Ok(&client))
            .await
            .unwrap();

        match &summary.registration {
            StageOutcome::Failed(reason) => assert!(reason.contains("500")),
            other => panic!("unexpected outcome: {other}"),
        }
    }

    #[tokio::test]
    async fn test_fallback_version_bump() {
        let (_temp, config, paths) = project(CLEAN_SOURCE);
        std::fs::write(&paths.metadata, "{\"slug\": \"kiw-forms\", \"version\": \"1.2\"}").unwrap();
        let mut vcs = RecordingPublisher::default();

        let summary = pipeline(&config, &paths, ReleaseOptions::default())
            .run(Ok(&mut vcs), Err("unused".to_string()))
            .await
            .unwrap();

        assert_eq!(summary.version, "1.2.1");
        assert_eq!(summary.tag, "v1.2.1");
    }
}
