//! External links offered for an activity

use crate::core::{pull_request_short_name, Activity, ActivityStep};
use crate::resolve::effects::Effect;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkKind {
    ReleaseNotes,
    Promote,
    Preview,
}

/// A link the user can open from the activity menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLink {
    pub kind: LinkKind,
    pub title: String,
    pub url: String,

    /// Short pull request identifier for promote links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ActionLink {
    /// Tooltip describing where the link goes
    pub fn description(&self) -> &'static str {
        match self.kind {
            LinkKind::ReleaseNotes => "view the release notes",
            LinkKind::Promote => "view the promote Pull Request",
            LinkKind::Preview => "View the preview environment application",
        }
    }

    pub fn open(&self) -> Effect {
        Effect::OpenLink {
            url: self.url.clone(),
        }
    }
}

/// Collect release notes, promotion and preview links in step order
///
/// Activities without steps have no links, release notes included.
pub fn extract_links(activity: &Activity) -> Vec<ActionLink> {
    let Some(spec) = activity.spec.as_ref() else {
        return Vec::new();
    };
    if spec.steps.is_empty() {
        return Vec::new();
    }

    let mut links = Vec::new();
    if let (Some(version), Some(url)) = (
        spec.version.as_deref().filter(|v| !v.is_empty()),
        spec.release_notes_url.as_deref().filter(|u| !u.is_empty()),
    ) {
        links.push(ActionLink {
            kind: LinkKind::ReleaseNotes,
            title: version.to_string(),
            url: url.to_string(),
            label: None,
        });
    }

    for step in &spec.steps {
        match step {
            ActivityStep::Promote(promote) => {
                if let Some(url) = promote.pull_request_url() {
                    links.push(ActionLink {
                        kind: LinkKind::Promote,
                        title: promote.title(),
                        url: url.to_string(),
                        label: Some(pull_request_short_name(url)),
                    });
                }
            }
            ActivityStep::Preview(preview) => {
                if let Some(url) = preview.application_url() {
                    links.push(ActionLink {
                        kind: LinkKind::Preview,
                        title: preview.title(),
                        url: url.to_string(),
                        label: None,
                    });
                }
            }
            ActivityStep::Stage(_) | ActivityStep::Empty => {}
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        ActivitySpec, PreviewActivityStep, PromoteActivityStep, PromotePullRequestStep,
        StageActivityStep,
    };

    fn promote(env: Option<&str>, name: Option<&str>, url: Option<&str>) -> ActivityStep {
        ActivityStep::Promote(PromoteActivityStep {
            environment: env.map(str::to_string),
            pull_request: Some(PromotePullRequestStep {
                name: name.map(str::to_string),
                pull_request_url: url.map(str::to_string),
                status: None,
            }),
            ..Default::default()
        })
    }

    fn activity(version: Option<&str>, notes: Option<&str>, steps: Vec<ActivityStep>) -> Activity {
        Activity {
            spec: Some(ActivitySpec {
                version: version.map(str::to_string),
                release_notes_url: notes.map(str::to_string),
                steps,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_release_notes_then_promote() {
        let pa = activity(
            Some("1.2.3"),
            Some("http://x"),
            vec![promote(None, Some("chore: promote app"), Some("http://git/pr/42"))],
        );
        let links = extract_links(&pa);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].kind, LinkKind::ReleaseNotes);
        assert_eq!(links[0].title, "1.2.3");
        assert_eq!(links[0].url, "http://x");
        assert_eq!(links[1].kind, LinkKind::Promote);
        assert_eq!(links[1].title, "chore: promote app");
        assert_eq!(links[1].url, "http://git/pr/42");
        assert_eq!(links[1].label.as_deref(), Some("42"));
    }

    #[test]
    fn test_promote_environment_overrides_title() {
        let pa = activity(
            None,
            None,
            vec![promote(Some("production"), Some("pr"), Some("http://git/pr/7"))],
        );
        let links = extract_links(&pa);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].title, "Promote to production");
    }

    #[test]
    fn test_promote_without_pull_request_is_skipped() {
        let pa = activity(
            None,
            None,
            vec![
                promote(Some("staging"), None, None),
                promote(Some("staging"), None, Some("")),
                ActivityStep::Promote(PromoteActivityStep::default()),
            ],
        );
        assert!(extract_links(&pa).is_empty());
    }

    #[test]
    fn test_preview_links() {
        let pa = activity(
            None,
            None,
            vec![
                ActivityStep::Stage(StageActivityStep::default()),
                ActivityStep::Preview(PreviewActivityStep {
                    application_url: Some("http://preview-1".to_string()),
                    ..Default::default()
                }),
                ActivityStep::Preview(PreviewActivityStep {
                    name: Some("pr-12".to_string()),
                    application_url: Some("http://preview-2".to_string()),
                    ..Default::default()
                }),
                ActivityStep::Preview(PreviewActivityStep {
                    name: Some("not deployed".to_string()),
                    ..Default::default()
                }),
            ],
        );
        let titles: Vec<String> = extract_links(&pa).into_iter().map(|l| l.title).collect();
        assert_eq!(titles, vec!["Preview".to_string(), "pr-12".to_string()]);
    }

    #[test]
    fn test_no_steps_no_links() {
        assert!(extract_links(&Activity::default()).is_empty());
        assert!(extract_links(&activity(Some("1.0.0"), Some("http://x"), vec![])).is_empty());
    }

    #[test]
    fn test_release_notes_need_both_values() {
        let pa = activity(
            Some("1.0.0"),
            None,
            vec![ActivityStep::Stage(StageActivityStep::default())],
        );
        assert!(extract_links(&pa).is_empty());
    }

    #[test]
    fn test_link_opens_url() {
        let pa = activity(
            Some("1.2.3"),
            Some("http://x"),
            vec![ActivityStep::Empty],
        );
        let links = extract_links(&pa);
        assert_eq!(
            links[0].open(),
            Effect::OpenLink {
                url: "http://x".to_string()
            }
        );
    }
}
