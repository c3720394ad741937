//! HTML documentation page for the bare API base route.
//!
//! Lists every registered endpoint in `(name, method)` order with its docs,
//! accepted arguments, example URLs and role requirements, and shows who
//! the caller is. Rendering reads the registry only.

use crate::auth::Identity;
use crate::endpoint::Endpoint;
use crate::method::Method;
use crate::registry::Registry;

/// Version of the REST interface itself, independent of the product version.
pub const API_VERSION: u32 = 1;

/// Display-only constants shown in the page header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiInfo {
    pub product: String,
    pub api_version: u32,
    pub product_version: String,
    pub charset: String,
}

impl Default for ApiInfo {
    fn default() -> Self {
        Self {
            product: "DOMjudge".into(),
            api_version: API_VERSION,
            product_version: env!("CARGO_PKG_VERSION").into(),
            charset: "utf-8".into(),
        }
    }
}

/// Render the documentation page.
///
/// `base_url` is the URL of the base route and should end with `/`; each
/// endpoint's route URL is `base_url` followed by its name.
///
/// ```text
/// <dt><a href="/api/problems">/api/problems</a> (GET)</dt>
/// <dd>
/// <p>Get a list of problems in a contest.</p>
/// <p>Optional arguments:</p>
/// <ul>
/// <li><em>cid</em>: ID of the contest to get the problems for</li>
/// </ul>
/// <p>Example usage:<br />
/// <a href="/api/problems?cid=2">/api/problems?cid=2</a><br />
/// </p>
/// <p>Required roles: none</p>
/// </dd>
/// ```
pub fn render_docs(
    registry: &Registry,
    identity: Option<&Identity>,
    base_url: &str,
    info: &ApiInfo,
) -> String {
    let product = escape(&info.product);
    let version = escape(&info.product_version);

    let mut out = String::from("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str(&format!("<meta charset=\"{}\">\n", escape(&info.charset)));
    out.push_str(&format!("<title>{product} version {version} REST API</title>\n"));
    out.push_str("</head>\n<body>\n");
    out.push_str(&format!("<h1>{product} REST API</h1>\n"));
    out.push_str(&format!(
        "<p>Welcome to the {product} REST API.<br />\nThis is API version: {}<br />\nrunning on {product} version: {version}</p>\n",
        info.api_version
    ));
    out.push_str(&format!("<p>You are: {}</p>\n", describe_caller(identity)));

    out.push_str("<p>The supported functions are:</p>\n<dl>\n");
    for (method, endpoint) in registry.iter() {
        render_endpoint(&mut out, base_url, method, endpoint);
    }
    out.push_str("</dl>\n</body>\n</html>\n");
    out
}

fn render_endpoint(out: &mut String, base_url: &str, method: Method, ep: &Endpoint) {
    let url = format!("{base_url}{}", ep.name());
    let url_html = escape(&url);
    out.push_str(&format!("<dt><a href=\"{url_html}\">{url_html}</a> ({method})</dt>\n"));
    out.push_str("<dd>\n");
    out.push_str(&format!("<p>{}</p>\n", escape(ep.doc_text())));

    // Examples only make sense for endpoints that accept arguments.
    if !ep.optional_args().is_empty() {
        out.push_str("<p>Optional arguments:</p>\n<ul>\n");
        for (name, desc) in ep.optional_args() {
            out.push_str(&format!("<li><em>{}</em>: {}</li>\n", escape(name), escape(desc)));
        }
        out.push_str("</ul>\n");

        if !ep.example_args().is_empty() {
            out.push_str("<p>Example usage:<br />\n");
            for example in ep.example_args() {
                let ex = escape(&format!("{url}?{}", query_string(example)));
                out.push_str(&format!("<a href=\"{ex}\">{ex}</a><br />\n"));
            }
            out.push_str("</p>\n");
        }
    }

    let roles = if ep.required_roles().is_empty() {
        "none".to_string()
    } else {
        ep.required_roles()
            .iter()
            .map(|r| escape(r))
            .collect::<Vec<_>>()
            .join(" or ")
    };
    out.push_str(&format!("<p>Required roles: {roles}</p>\n"));
    out.push_str("</dd>\n");
}

// --- helpers -----------------------------------------------------------------

fn describe_caller(identity: Option<&Identity>) -> String {
    let Some((id, username)) = identity.and_then(|id| id.username.as_deref().map(|u| (id, u))) else {
        return "anonymous user".into();
    };
    let mut roles: Vec<String> = id.roles.iter().map(|r| escape(r)).collect();
    if let Some(team) = id.team_id.as_deref().filter(|t| !t.is_empty()) {
        roles.push(format!("team({})", escape(team)));
    }
    if roles.is_empty() {
        format!("{} with no roles", escape(username))
    } else {
        format!("{} with roles {}", escape(username), roles.join(", "))
    }
}

fn query_string(args: &[(String, String)]) -> String {
    args.iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_registry() -> Registry {
        let mut b = Registry::builder();
        b.register(
            "PUT",
            Endpoint::new("team", |_| Ok(json!(null)))
                .docs("Update a team.")
                .optional_arg("name", "new name")
                .require_roles(["jury"]),
        )
        .unwrap();
        b.register(
            "GET",
            Endpoint::new("problems", |_| Ok(json!([])))
                .docs("Get a list of problems in a contest.")
                .optional_arg("cid", "ID of the contest to get the problems for")
                .example([("cid", "2")])
                .example([("cid", "2"), ("name", "a b")]),
        )
        .unwrap();
        b.register("GET", Endpoint::new("info", |_| Ok(json!({}))).docs("Get general API information."))
            .unwrap();
        b.register(
            "GET",
            Endpoint::new("team", |_| Ok(json!(null))).example([("ignored", "1")]),
        )
        .unwrap();
        b.seal()
    }

    fn render(identity: Option<&Identity>) -> String {
        render_docs(&sample_registry(), identity, "/api/", &ApiInfo::default())
    }

    #[test]
    fn endpoints_listed_in_name_then_method_order() {
        let html = render(None);
        let pos = |needle: &str| html.find(needle).unwrap_or_else(|| panic!("missing {needle}"));
        let info = pos("/api/info</a> (GET)");
        let problems = pos("/api/problems</a> (GET)");
        let team_get = pos("/api/team</a> (GET)");
        let team_put = pos("/api/team</a> (PUT)");
        assert!(info < problems && problems < team_get && team_get < team_put);
    }

    #[test]
    fn header_shows_versions_and_charset() {
        let info = ApiInfo {
            product: "DOMjudge".into(),
            api_version: 1,
            product_version: "3.3.0".into(),
            charset: "utf-8".into(),
        };
        let html = render_docs(&sample_registry(), None, "/api/", &info);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<meta charset=\"utf-8\">"));
        assert!(html.contains("<title>DOMjudge version 3.3.0 REST API</title>"));
        assert!(html.contains("This is API version: 1"));
    }

    #[test]
    fn arguments_and_examples_are_rendered() {
        let html = render(None);
        assert!(html.contains("<li><em>cid</em>: ID of the contest to get the problems for</li>"));
        assert!(html.contains("<a href=\"/api/problems?cid=2\">/api/problems?cid=2</a>"));
        assert!(html.contains("/api/problems?cid=2&amp;name=a%20b"));
    }

    #[test]
    fn examples_hidden_without_optional_args() {
        let html = render(None);
        assert!(!html.contains("ignored=1"));
    }

    #[test]
    fn required_roles_only_as_registered() {
        let html = render(None);
        assert_eq!(html.matches("Required roles: jury").count(), 1);
        assert_eq!(html.matches("Required roles: none").count(), 3);
    }

    #[test]
    fn anonymous_caller() {
        assert!(render(None).contains("You are: anonymous user"));
        let nameless = Identity::default();
        assert!(render(Some(&nameless)).contains("You are: anonymous user"));
    }

    #[test]
    fn caller_roles_include_team_membership() {
        let id = Identity {
            username: Some("team01".into()),
            roles: vec!["team".into()],
            team_id: Some("7".into()),
        };
        assert!(render(Some(&id)).contains("You are: team01 with roles team, team(7)"));
    }

    #[test]
    fn user_text_is_escaped() {
        let id = Identity {
            username: Some("<script>".into()),
            roles: vec![],
            team_id: None,
        };
        let html = render(Some(&id));
        assert!(html.contains("You are: &lt;script&gt; with no roles"));
        assert!(!html.contains("<script>"));
    }
}
