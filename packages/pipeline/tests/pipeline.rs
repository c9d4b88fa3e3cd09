use prerender_compiler_css::{CssMode, GenerateOutcome};
use prerender_compiler_html::RendererKind;
use prerender_pipeline::{
    Capabilities, ComponentOutcome, ComponentState, Config, Mode, Orchestrator, PipelineError, PrerenderPlugin,
    WatchEvent, LEDGER_FILE,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/components")).unwrap();
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn component(&self, name: &str, source: &str) -> PathBuf {
        let path = self.root().join("src/components").join(name);
        fs::write(&path, source).unwrap();
        path
    }

    fn output(&self, name: &str) -> PathBuf {
        self.root().join("public/components").join(name)
    }

    fn read_output(&self, name: &str) -> String {
        fs::read_to_string(self.output(name)).unwrap()
    }

    fn orchestrator(&self, config: Config) -> Orchestrator {
        Orchestrator::new(self.root(), config).unwrap()
    }
}

const HEADER: &str = "<header class=\"p-4 site-header\">Site</header>\n<style>.site-header { color: navy; }</style>\n";

#[test]
fn test_first_pass_writes_fragment_and_stylesheet() {
    let project = Project::new();
    project.component("Footer.astro", "---\nyear = \"2024\"\n---\n<p>{year}</p>\n");
    project.component("Header.astro", HEADER);

    let report = project.orchestrator(Config::default()).run_pass().unwrap();

    assert_eq!(report.written(), 2);
    assert_eq!(project.read_output("Footer.html"), "<p>2024</p>");
    assert_eq!(project.read_output("Header.html"), "<header class=\"p-4 site-header\">Site</header>");
    assert_eq!(
        project.read_output("lazy-components.css"),
        ".p-4 { padding: 1rem }\n\n/* Header */\n.site-header { color: navy; }\n"
    );
    assert!(project.root().join(".prerender-cache/content-cache.json").exists());
}

#[test]
fn test_unchanged_component_is_cached_on_next_run() {
    let project = Project::new();
    project.component("Header.astro", HEADER);

    project.orchestrator(Config::default()).run_pass().unwrap();
    let fragment = project.output("Header.html");
    let before = fs::metadata(&fragment).unwrap();
    let stylesheet = project.read_output("lazy-components.css");

    // a fresh orchestrator reads the persisted cache
    let report = project.orchestrator(Config::default()).run_pass().unwrap();

    assert_eq!(report.cached(), 1);
    assert_eq!(report.written(), 0);
    let after = fs::metadata(&fragment).unwrap();
    assert_eq!(before.modified().unwrap(), after.modified().unwrap());
    assert_eq!(before.len(), after.len());
    // cached components still contribute to the stylesheet
    assert_eq!(project.read_output("lazy-components.css"), stylesheet);
}

#[test]
fn test_changed_source_is_rerendered() {
    let project = Project::new();
    let path = project.component("Card.astro", "<div class=\"flex\">v1</div>");
    let mut orchestrator = project.orchestrator(Config::default());
    orchestrator.run_pass().unwrap();

    fs::write(&path, "<div class=\"grid\">v2</div>").unwrap();
    let report = orchestrator.run_pass().unwrap();

    assert_eq!(report.written(), 1);
    assert_eq!(project.read_output("Card.html"), "<div class=\"grid\">v2</div>");
    assert_eq!(project.read_output("lazy-components.css"), ".grid { display: grid }\n");
}

#[test]
fn test_full_renderer_resolves_nested_components() {
    let project = Project::new();
    project.component("Logo.astro", "<img src=\"/logo.svg\" alt=\"Logo\">");
    project.component(
        "Header.astro",
        "---\nimport Logo from \"./Logo.astro\";\n---\n<header class=\"site-header\"><Logo /></header>",
    );

    let structural = Project::new();
    structural.component("Logo.astro", "<img src=\"/logo.svg\" alt=\"Logo\">");
    structural.component(
        "Header.astro",
        "---\nimport Logo from \"./Logo.astro\";\n---\n<header class=\"site-header\"><Logo /></header>",
    );

    let config = Config {
        renderer: RendererKind::Full,
        ..Config::default()
    };
    project.orchestrator(config).run_pass().unwrap();
    structural.orchestrator(Config::default()).run_pass().unwrap();

    assert_eq!(
        project.read_output("Header.html"),
        "<header class=\"site-header\"><img src=\"/logo.svg\" alt=\"Logo\" /></header>"
    );
    assert_eq!(
        structural.read_output("Header.html"),
        "<header class=\"site-header\"><!-- Component: Logo --></header>"
    );
}

#[test]
fn test_full_renderer_without_context_falls_back() {
    let project = Project::new();
    project.component("Footer.astro", "<footer>bye</footer>");

    let config = Config {
        renderer: RendererKind::Full,
        ..Config::default()
    };
    let capabilities = Capabilities {
        module_context: None,
        ..Capabilities::default()
    };
    let report = Orchestrator::with_capabilities(project.root(), config, capabilities)
        .unwrap()
        .run_pass()
        .unwrap();

    assert!(matches!(
        report.components[0].outcome,
        ComponentOutcome::Written {
            renderer: RendererKind::Structural,
            ..
        }
    ));
    assert_eq!(project.read_output("Footer.html"), "<footer>bye</footer>");
}

#[test]
fn test_failures_are_isolated() {
    let project = Project::new();
    project.component("Broken.astro", "<div><span></div>");
    project.component("Good.astro", "<p class=\"font-bold\">ok</p>");

    let mut orchestrator = project.orchestrator(Config::default());
    let report = orchestrator.run_pass().unwrap();

    assert_eq!(report.written(), 1);
    assert_eq!(report.failed(), 1);
    let (path, error) = report.failures().next().unwrap();
    assert!(path.ends_with("Broken.astro"));
    assert!(matches!(error, PipelineError::Render { .. }));
    assert!(error.is_component_failure());

    assert!(!project.output("Broken.html").exists());
    assert_eq!(project.read_output("Good.html"), "<p class=\"font-bold\">ok</p>");
    assert_eq!(orchestrator.cache().len(), 1);

    // a failed component is retried next pass
    let again = orchestrator.run_pass().unwrap();
    assert_eq!(again.components[0].outcome.state(), ComponentState::Failed);
    assert_eq!(again.components[1].outcome.state(), ComponentState::Cached);
}

#[test]
fn test_remove_event_deletes_outputs() {
    let project = Project::new();
    project.component("Header.astro", HEADER);
    project.component("Footer.astro", "<footer class=\"text-center\">bye</footer>");

    let mut orchestrator = project.orchestrator(Config::default());
    orchestrator.run_pass().unwrap();
    assert!(project.output("Header.html").exists());

    let header = orchestrator.components_dir().join("Header.astro");
    fs::remove_file(&header).unwrap();
    let outcome = orchestrator.handle_event(&WatchEvent::Remove(header.clone())).unwrap();

    assert!(outcome.is_none());
    assert!(!project.output("Header.html").exists());
    assert!(project.output("Footer.html").exists());
    assert_eq!(orchestrator.cache().get(&header.display().to_string()), None);
    assert_eq!(
        project.read_output("lazy-components.css"),
        ".text-center { text-align: center }\n"
    );

    let persisted = fs::read_to_string(project.root().join(".prerender-cache/content-cache.json")).unwrap();
    assert!(!persisted.contains("Header.astro"));
}

#[test]
fn test_change_and_add_events_render_incrementally() {
    let project = Project::new();
    project.component("Footer.astro", "<footer class=\"text-center\">bye</footer>");
    let mut orchestrator = project.orchestrator(Config::default());
    orchestrator.run_pass().unwrap();

    let card = orchestrator.components_dir().join("Card.astro");
    fs::write(&card, "<div class=\"flex\">card</div>").unwrap();
    let outcome = orchestrator.handle_event(&WatchEvent::Add(card)).unwrap();

    assert!(matches!(outcome, Some(ComponentOutcome::Written { .. })));
    assert_eq!(project.read_output("Card.html"), "<div class=\"flex\">card</div>");
    // the untouched footer's classes survive the regenerated stylesheet
    assert_eq!(
        project.read_output("lazy-components.css"),
        ".flex { display: flex }\n.text-center { text-align: center }\n"
    );

    let ignored = orchestrator
        .handle_event(&WatchEvent::Change(orchestrator.components_dir().join("notes.md")))
        .unwrap();
    assert!(ignored.is_none());
}

#[test]
fn test_per_component_css_mode() {
    let project = Project::new();
    project.component("Header.astro", HEADER);
    project.component("Footer.astro", "<footer>bye</footer>\n<style>footer { margin: 0; }</style>");

    let config = Config {
        css_mode: CssMode::PerComponent,
        ..Config::default()
    };
    let mut orchestrator = project.orchestrator(config);
    let report = orchestrator.run_pass().unwrap();

    assert!(matches!(report.stylesheet, GenerateOutcome::Split { components: 2, .. }));
    assert_eq!(project.read_output("base.css"), ".p-4 { padding: 1rem }\n");
    assert_eq!(project.read_output("Footer.css"), "/* Footer */\nfooter { margin: 0; }\n");
    assert!(project.read_output("css-manifest.json").contains("\"Header\": \"Header.css\""));
    assert!(!project.output("lazy-components.css").exists());

    let footer = orchestrator.components_dir().join("Footer.astro");
    fs::remove_file(&footer).unwrap();
    orchestrator.handle_event(&WatchEvent::Remove(footer)).unwrap();
    assert!(!project.output("Footer.css").exists());
    assert!(!project.read_output("css-manifest.json").contains("Footer"));
}

#[test]
fn test_unminified_output_keeps_whitespace() {
    let project = Project::new();
    project.component("List.astro", "<ul>\n  <li>One</li>\n</ul>\n");

    let config = Config {
        minify: false,
        ..Config::default()
    };
    project.orchestrator(config).run_pass().unwrap();

    assert_eq!(project.read_output("List.html"), "<ul>\n  <li>One</li>\n</ul>");
}

#[test]
fn test_debug_attributes_and_scripts_are_stripped() {
    let project = Project::new();
    project.component(
        "Widget.astro",
        "<div data-astro-source-file=\"/src/Widget.astro\" class=\"block\">w</div>\n<script>init()</script>",
    );

    project.orchestrator(Config::default()).run_pass().unwrap();

    assert_eq!(project.read_output("Widget.html"), "<div class=\"block\">w</div>");
}

#[test]
fn test_missing_components_dir_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = Orchestrator::new(dir.path(), Config::default()).err().unwrap();
    assert!(matches!(err, PipelineError::RootNotFound { .. }));
}

#[test]
fn test_empty_project_skips_stylesheet() {
    let project = Project::new();
    let report = project.orchestrator(Config::default()).run_pass().unwrap();

    assert!(report.components.is_empty());
    assert_eq!(report.stylesheet, GenerateOutcome::Skipped);
    assert!(!project.output("lazy-components.css").exists());
}

#[cfg(unix)]
#[test]
fn test_plugin_events_through_symlinked_root() {
    let project = Project::new();
    project.component("Card.astro", "<div class=\"flex\">card</div>");
    project.component("Footer.astro", "<footer class=\"text-center\">bye</footer>");

    let links = tempfile::tempdir().unwrap();
    let root = links.path().join("site");
    std::os::unix::fs::symlink(project.root(), &root).unwrap();

    let mut plugin = PrerenderPlugin::new(None);
    plugin.config_resolved(&root, Mode::Serve).unwrap();
    assert_eq!(plugin.build_start().unwrap().written(), 2);

    let card = root.join("src/components/Card.astro");
    fs::write(&card, "<div class=\"grid\">card</div>").unwrap();
    let outcome = plugin.on_change(card.clone()).unwrap();

    assert!(matches!(outcome, Some(ComponentOutcome::Written { .. })));
    assert_eq!(
        project.read_output("lazy-components.css"),
        ".grid { display: grid }\n.text-center { text-align: center }\n"
    );

    fs::remove_file(&card).unwrap();
    plugin.on_remove(card).unwrap();

    assert!(!project.output("Card.html").exists());
    assert_eq!(
        project.read_output("lazy-components.css"),
        ".text-center { text-align: center }\n"
    );
    let persisted = fs::read_to_string(project.root().join(".prerender-cache/content-cache.json")).unwrap();
    assert!(!persisted.contains("Card.astro"));
    assert!(persisted.contains("Footer.astro"));
}

#[test]
fn test_dotted_event_path_shares_the_cache_key() {
    let project = Project::new();
    project.component("Card.astro", "<div class=\"flex\">card</div>");
    let mut orchestrator = project.orchestrator(Config::default());
    orchestrator.run_pass().unwrap();

    let dotted = orchestrator.components_dir().join("../components/Card.astro");
    fs::write(&dotted, "<div class=\"grid\">card</div>").unwrap();
    orchestrator.handle_event(&WatchEvent::Change(dotted)).unwrap();

    assert_eq!(orchestrator.cache().len(), 1);
    assert_eq!(project.read_output("lazy-components.css"), ".grid { display: grid }\n");
}

#[test]
fn test_unwritable_fragment_fails_only_that_component() {
    let project = Project::new();
    let bad = project.component("Bad.astro", "<p class=\"flex\">bad</p>");
    project.component("Good.astro", "<p class=\"font-bold\">ok</p>");
    // a directory where the fragment should go makes the final rename fail
    fs::create_dir_all(project.output("Bad.html").join("blocker")).unwrap();

    let mut orchestrator = project.orchestrator(Config::default());
    let report = orchestrator.run_pass().unwrap();

    assert_eq!(report.written(), 1);
    let (path, error) = report.failures().next().unwrap();
    assert!(path.ends_with("Bad.astro"));
    assert!(matches!(error, PipelineError::Write { .. }));
    assert!(error.is_component_failure());

    assert_eq!(project.read_output("Good.html"), "<p class=\"font-bold\">ok</p>");
    let bad_key = orchestrator
        .components_dir()
        .join(bad.file_name().unwrap())
        .display()
        .to_string();
    assert_eq!(orchestrator.cache().get(&bad_key), None);
    assert_eq!(orchestrator.cache().len(), 1);
    assert_eq!(project.read_output("lazy-components.css"), ".font-bold { font-weight: 700 }\n");
}

#[test]
fn test_missing_ledger_rerenders_cached_components() {
    let project = Project::new();
    project.component("Header.astro", HEADER);
    project.component("Footer.astro", "<footer class=\"text-center\">bye</footer>");
    project.orchestrator(Config::default()).run_pass().unwrap();
    let stylesheet = project.read_output("lazy-components.css");

    fs::remove_file(project.root().join(".prerender-cache").join(LEDGER_FILE)).unwrap();
    let report = project.orchestrator(Config::default()).run_pass().unwrap();

    assert_eq!(report.written(), 2);
    assert_eq!(report.cached(), 0);
    assert_eq!(project.read_output("lazy-components.css"), stylesheet);
}
