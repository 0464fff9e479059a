//! Activity menu: what can be done with an activity, and the effects to do it

use crate::core::config::Settings;
use crate::core::{container_names, flatten_steps, running_container_name, Activity, Breakpoint, Pod};
use crate::persistence::{BreakpointStore, PodStore};
use crate::resolve::breakpoints::breakpoint_for_activity;
use crate::resolve::effects::{Effect, Platform};
use crate::resolve::links::{extract_links, ActionLink};
use crate::resolve::pods::PodResolver;
use serde::Serialize;
use tracing::{debug, warn};

/// State of the breakpoint entry of the menu
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BreakpointState {
    /// Breakpoints are not loaded yet, nothing can be offered
    Hidden,
    Add,
    Remove { breakpoint: Breakpoint },
}

/// A log or shell entry: the "latest step" shortcut or a named container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerTarget {
    pub label: String,
    pub container: String,
}

/// Everything the menu of one activity offers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityMenu {
    pub containers: Vec<String>,

    /// Container of the step currently running
    pub running_step: Option<String>,

    /// Running step, or the last step once the run is over
    pub latest_step: Option<String>,

    pub breakpoint: BreakpointState,

    /// `spec.gitUrl`, empty when unknown
    pub repository_url: String,

    pub links: Vec<ActionLink>,
}

impl ActivityMenu {
    pub fn build(activity: &Activity, breakpoints: &dyn BreakpointStore) -> Self {
        let steps = flatten_steps(activity);
        let running_step = running_container_name(steps.iter().copied(), false);
        let latest_step = running_container_name(steps.iter().copied(), true);

        let breakpoint = if !breakpoints.is_loaded() {
            BreakpointState::Hidden
        } else {
            match breakpoint_for_activity(breakpoints, activity) {
                Some(breakpoint) => BreakpointState::Remove { breakpoint },
                None => BreakpointState::Add,
            }
        };

        Self {
            containers: container_names(activity),
            running_step,
            latest_step,
            breakpoint,
            repository_url: activity.git_url().unwrap_or_default().to_string(),
            links: extract_links(activity),
        }
    }

    pub fn shows_logs(&self) -> bool {
        !self.containers.is_empty()
    }

    pub fn shows_shell(&self) -> bool {
        !self.containers.is_empty() && self.running_step.is_some()
    }

    /// Log entries: the latest step, then every container when there are several
    pub fn log_targets(&self) -> Vec<ContainerTarget> {
        if !self.shows_logs() {
            return Vec::new();
        }
        self.targets(self.latest_step.as_deref())
    }

    /// Shell entries: the running step, then every container when there are several
    pub fn shell_targets(&self) -> Vec<ContainerTarget> {
        if !self.shows_shell() {
            return Vec::new();
        }
        self.targets(self.running_step.as_deref())
    }

    fn targets(&self, shortcut: Option<&str>) -> Vec<ContainerTarget> {
        let Some(shortcut) = shortcut else {
            return Vec::new();
        };
        let mut targets = vec![ContainerTarget {
            label: "latest step".to_string(),
            container: shortcut.to_string(),
        }];
        if self.containers.len() > 1 {
            targets.extend(self.containers.iter().map(|name| ContainerTarget {
                label: name.clone(),
                container: name.clone(),
            }));
        }
        targets
    }
}

/// Turns menu selections for one activity into effects
pub struct ActivityActions<'a> {
    activity: &'a Activity,
    pods: PodResolver<'a>,
    settings: &'a Settings,
    platform: Platform,
}

impl<'a> ActivityActions<'a> {
    pub fn new(activity: &'a Activity, pods: &'a dyn PodStore, settings: &'a Settings) -> Self {
        Self {
            activity,
            pods: PodResolver::new(pods, settings),
            settings,
            platform: Platform::current(),
        }
    }

    /// Override the platform the shell command is built for
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Show the logs of a step container
    pub fn view_logs(&self, container: &str) -> Option<Effect> {
        let Some(pod) = self.pods.resolve(self.activity) else {
            warn!("Could not find pod for activity {}", self.activity.name());
            return None;
        };
        if pod.container(container).is_none() {
            warn!("Could not find container {} in pod {}", container, pod.name());
            return None;
        }
        Some(Effect::ViewLogs {
            pod: pod.to_ref(),
            container: container.to_string(),
        })
    }

    /// Open a shell in the activity pod, optionally in one container
    pub fn exec_shell(&self, container: Option<&str>) -> Option<Effect> {
        let Some(pod) = self.pods.resolve(self.activity) else {
            warn!("Could not find pod for activity {}", self.activity.name());
            return None;
        };
        debug!("Opening shell in pod {}/{}", pod.namespace(), pod.name());
        Some(Effect::OpenShell {
            title: format!("Pod: {} (namespace: {})", pod.name(), pod.namespace()),
            command: shell_command(&self.settings.kubectl, &pod, container, self.platform),
            pod: pod.to_ref(),
        })
    }

    /// Pause future runs of this pipeline on the configured triggers
    pub fn add_breakpoint(&self) -> Effect {
        let Breakpoint { metadata, spec, .. } =
            Breakpoint::for_activity(self.activity, &self.settings.breakpoint_triggers);
        Effect::CreateBreakpoint { metadata, spec }
    }

    pub fn remove_breakpoint(&self, breakpoint: &Breakpoint) -> Effect {
        Effect::RemoveBreakpoint {
            breakpoint: breakpoint.clone(),
        }
    }

    pub fn open_repository(&self) -> Option<Effect> {
        self.open_link(self.activity.git_url().unwrap_or_default())
    }

    pub fn open_link(&self, url: &str) -> Option<Effect> {
        if url.is_empty() {
            debug!("No link to open for activity {}", self.activity.name());
            return None;
        }
        Some(Effect::OpenLink {
            url: url.to_string(),
        })
    }
}

/// Command line that attaches an interactive shell to a pod
pub fn shell_command(kubectl: &str, pod: &Pod, container: Option<&str>, platform: Platform) -> String {
    let mut command = format!("{} exec -i -t -n {} {}", kubectl, pod.namespace(), pod.name());
    if let Some(container) = container.filter(|c| !c.is_empty()) {
        command.push_str(&format!(" -c {}", container));
    }
    command.push_str(" \"--\"");

    if platform != Platform::Windows {
        command = format!("exec {}", command);
    }

    if pod.selected_node_os() == Some("windows") {
        command.push_str(" powershell");
    } else {
        command.push_str(" sh -c \"clear; (bash || ash || sh)\"");
    }
    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ActivitySpec, CoreActivityStep, ObjectMeta, StageActivityStep, ActivityStep};
    use crate::persistence::{InMemoryBreakpointStore, InMemoryPodStore};
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn step(name: &str, done: bool) -> CoreActivityStep {
        CoreActivityStep {
            name: name.to_string(),
            completed_timestamp: done.then(Utc::now),
            ..Default::default()
        }
    }

    fn activity(steps: Vec<CoreActivityStep>) -> Activity {
        Activity {
            metadata: ObjectMeta::new("acme-app-main-5", Some("jx".to_string()))
                .with_label("podName", "pod-1"),
            spec: Some(ActivitySpec {
                git_url: Some("https://github.com/acme/app.git".to_string()),
                steps: vec![ActivityStep::Stage(StageActivityStep {
                    name: "from build pack".to_string(),
                    steps,
                    ..Default::default()
                })],
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_menu_for_running_activity() {
        let pa = activity(vec![step("Build", true), step("Unit Test", false)]);
        let menu = ActivityMenu::build(&pa, &InMemoryBreakpointStore::new(vec![]));

        assert_eq!(menu.containers, vec!["step-build", "step-unit-test"]);
        assert_eq!(menu.running_step.as_deref(), Some("step-unit-test"));
        assert_eq!(menu.latest_step.as_deref(), Some("step-unit-test"));
        assert!(menu.shows_logs());
        assert!(menu.shows_shell());
        assert_eq!(menu.breakpoint, BreakpointState::Add);
        assert_eq!(menu.repository_url, "https://github.com/acme/app.git");

        let logs = menu.log_targets();
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[0].label, "latest step");
        assert_eq!(logs[0].container, "step-unit-test");
        assert_eq!(logs[2].container, "step-unit-test");
    }

    #[test]
    fn test_menu_for_finished_activity() {
        let pa = activity(vec![step("Build", true)]);
        let menu = ActivityMenu::build(&pa, &InMemoryBreakpointStore::unloaded());

        assert_eq!(menu.running_step, None);
        assert_eq!(menu.latest_step.as_deref(), Some("step-build"));
        assert!(menu.shows_logs());
        assert!(!menu.shows_shell());
        assert!(menu.shell_targets().is_empty());
        assert_eq!(menu.breakpoint, BreakpointState::Hidden);

        // a single container only gets the shortcut
        assert_eq!(menu.log_targets().len(), 1);
    }

    #[test]
    fn test_menu_without_steps() {
        let menu = ActivityMenu::build(&Activity::default(), &InMemoryBreakpointStore::new(vec![]));
        assert!(menu.containers.is_empty());
        assert!(!menu.shows_logs());
        assert!(!menu.shows_shell());
        assert!(menu.links.is_empty());
        assert_eq!(menu.repository_url, "");
    }

    #[test]
    fn test_menu_offers_removal_of_matching_breakpoint() {
        let pa = activity(vec![]);
        let existing = Breakpoint::for_activity(&pa, &["onFailure".to_string()]);
        let store = InMemoryBreakpointStore::new(vec![existing.clone()]);
        let menu = ActivityMenu::build(&pa, &store);
        assert_eq!(
            menu.breakpoint,
            BreakpointState::Remove {
                breakpoint: existing
            }
        );
    }

    #[test]
    fn test_view_logs_requires_container() {
        let pa = activity(vec![step("Build", false)]);
        let pods = InMemoryPodStore::new(vec![Pod::new("pod-1", "jx", &["step-build"])]);
        let settings = Settings::default();
        let actions = ActivityActions::new(&pa, &pods, &settings);

        match actions.view_logs("step-build") {
            Some(Effect::ViewLogs { pod, container }) => {
                assert_eq!(pod.name, "pod-1");
                assert_eq!(container, "step-build");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(actions.view_logs("step-deploy").is_none());
    }

    #[test]
    fn test_actions_without_pod() {
        let pa = activity(vec![step("Build", false)]);
        let pods = InMemoryPodStore::default();
        let settings = Settings::default();
        let actions = ActivityActions::new(&pa, &pods, &settings);

        assert!(actions.view_logs("step-build").is_none());
        assert!(actions.exec_shell(Some("step-build")).is_none());
    }

    #[test]
    fn test_exec_shell_effect() {
        let pa = activity(vec![step("Build", false)]);
        let pods = InMemoryPodStore::new(vec![Pod::new("pod-1", "jx", &["step-build"])]);
        let settings = Settings::default();
        let actions = ActivityActions::new(&pa, &pods, &settings).with_platform(Platform::Unix);

        match actions.exec_shell(Some("step-build")) {
            Some(Effect::OpenShell { title, command, .. }) => {
                assert_eq!(title, "Pod: pod-1 (namespace: jx)");
                assert_eq!(
                    command,
                    "exec kubectl exec -i -t -n jx pod-1 -c step-build \"--\" sh -c \"clear; (bash || ash || sh)\""
                );
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_shell_command_for_windows() {
        let mut pod = Pod::new("pod-1", "jx", &[]);
        let mut selector = BTreeMap::new();
        selector.insert("kubernetes.io/os".to_string(), "windows".to_string());
        pod.spec.node_selector = Some(selector);

        assert_eq!(
            shell_command("kubectl", &pod, None, Platform::Windows),
            "kubectl exec -i -t -n jx pod-1 \"--\" powershell"
        );
        assert_eq!(
            shell_command("kubectl", &pod, None, Platform::Unix),
            "exec kubectl exec -i -t -n jx pod-1 \"--\" powershell"
        );
    }

    #[test]
    fn test_breakpoint_effects() {
        let pa = activity(vec![]);
        let pods = InMemoryPodStore::default();
        let settings = Settings::default();
        let actions = ActivityActions::new(&pa, &pods, &settings);

        match actions.add_breakpoint() {
            Effect::CreateBreakpoint { metadata, spec } => {
                assert_eq!(metadata.name, "acme-app-main-5");
                assert_eq!(metadata.namespace.as_deref(), Some("jx"));
                assert_eq!(spec.debug.breakpoint, vec!["onFailure".to_string()]);
            }
            other => panic!("unexpected {:?}", other),
        }

        let bp = Breakpoint::for_activity(&pa, &[]);
        assert_eq!(
            actions.remove_breakpoint(&bp),
            Effect::RemoveBreakpoint { breakpoint: bp }
        );
    }

    #[test]
    fn test_open_links() {
        let pa = activity(vec![]);
        let pods = InMemoryPodStore::default();
        let settings = Settings::default();
        let actions = ActivityActions::new(&pa, &pods, &settings);

        assert_eq!(
            actions.open_repository(),
            Some(Effect::OpenLink {
                url: "https://github.com/acme/app.git".to_string()
            })
        );
        assert!(actions.open_link("").is_none());
        assert!(ActivityActions::new(&Activity::default(), &pods, &settings)
            .open_repository()
            .is_none());
    }
}
