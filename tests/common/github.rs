//! GitHub API fixtures shared by tests that talk to a mock server.

use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde_json::{Map, Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build an octocrab client pointing to a mock server.
pub async fn mock_client(server: &MockServer) -> Octocrab {
    Octocrab::builder()
        .base_uri(server.uri())
        .expect("Failed to set base URI")
        .build()
        .expect("Failed to build octocrab")
}

/// Serve `pr` from `GET /repos/owner/repo/pulls/{number}`.
pub async fn mount_pr(server: &MockServer, number: u64, pr: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/owner/repo/pulls/{}", number)))
        .respond_with(ResponseTemplate::new(200).set_body_json(pr))
        .mount(server)
        .await;
}

/// Answer `GET /repos/owner/repo/pulls/{number}` with a GitHub 404 body.
pub async fn mount_missing_pr(server: &MockServer, number: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/owner/repo/pulls/{}", number)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest/pulls/pulls#get-a-pull-request"
        })))
        .mount(server)
        .await;
}

/// Create a mock user object with all fields GitHub API returns.
pub fn mock_user(login: &str, id: u64) -> Value {
    let mut user = Map::new();
    user.insert("login".into(), json!(login));
    user.insert("id".into(), json!(id));
    user.insert("node_id".into(), json!(format!("MDQ6VXNlcnt{}", id)));
    user.insert("avatar_url".into(), json!(format!("https://avatars.githubusercontent.com/u/{}?v=4", id)));
    user.insert("gravatar_id".into(), json!(""));
    user.insert("url".into(), json!(format!("https://api.github.com/users/{}", login)));
    user.insert("html_url".into(), json!(format!("https://github.com/{}", login)));
    user.insert("followers_url".into(), json!(format!("https://api.github.com/users/{}/followers", login)));
    user.insert("following_url".into(), json!(format!("https://api.github.com/users/{}/following{{/other_user}}", login)));
    user.insert("gists_url".into(), json!(format!("https://api.github.com/users/{}/gists{{/gist_id}}", login)));
    user.insert("starred_url".into(), json!(format!("https://api.github.com/users/{}/starred{{/owner}}{{/repo}}", login)));
    user.insert("subscriptions_url".into(), json!(format!("https://api.github.com/users/{}/subscriptions", login)));
    user.insert("organizations_url".into(), json!(format!("https://api.github.com/users/{}/orgs", login)));
    user.insert("repos_url".into(), json!(format!("https://api.github.com/users/{}/repos", login)));
    user.insert("events_url".into(), json!(format!("https://api.github.com/users/{}/events{{/privacy}}", login)));
    user.insert("received_events_url".into(), json!(format!("https://api.github.com/users/{}/received_events", login)));
    user.insert("type".into(), json!("User"));
    user.insert("site_admin".into(), json!(false));
    Value::Object(user)
}

/// Create a mock repository object with all required fields.
pub fn mock_repo() -> Value {
    let mut repo = Map::new();
    repo.insert("id".into(), json!(1));
    repo.insert("node_id".into(), json!("MDEwOlJlcG9zaXRvcnkx"));
    repo.insert("name".into(), json!("repo"));
    repo.insert("full_name".into(), json!("owner/repo"));
    repo.insert("owner".into(), mock_user("owner", 1));
    repo.insert("private".into(), json!(false));
    repo.insert("html_url".into(), json!("https://github.com/owner/repo"));
    repo.insert("description".into(), json!("Test repository"));
    repo.insert("fork".into(), json!(false));
    repo.insert("url".into(), json!("https://api.github.com/repos/owner/repo"));
    repo.insert("forks_url".into(), json!("https://api.github.com/repos/owner/repo/forks"));
    repo.insert("keys_url".into(), json!("https://api.github.com/repos/owner/repo/keys{/key_id}"));
    repo.insert("collaborators_url".into(), json!("https://api.github.com/repos/owner/repo/collaborators{/collaborator}"));
    repo.insert("teams_url".into(), json!("https://api.github.com/repos/owner/repo/teams"));
    repo.insert("hooks_url".into(), json!("https://api.github.com/repos/owner/repo/hooks"));
    repo.insert("issue_events_url".into(), json!("https://api.github.com/repos/owner/repo/issues/events{/number}"));
    repo.insert("events_url".into(), json!("https://api.github.com/repos/owner/repo/events"));
    repo.insert("assignees_url".into(), json!("https://api.github.com/repos/owner/repo/assignees{/user}"));
    repo.insert("branches_url".into(), json!("https://api.github.com/repos/owner/repo/branches{/branch}"));
    repo.insert("tags_url".into(), json!("https://api.github.com/repos/owner/repo/tags"));
    repo.insert("blobs_url".into(), json!("https://api.github.com/repos/owner/repo/git/blobs{/sha}"));
    repo.insert("git_tags_url".into(), json!("https://api.github.com/repos/owner/repo/git/tags{/sha}"));
    repo.insert("git_refs_url".into(), json!("https://api.github.com/repos/owner/repo/git/refs{/sha}"));
    repo.insert("trees_url".into(), json!("https://api.github.com/repos/owner/repo/git/trees{/sha}"));
    repo.insert("statuses_url".into(), json!("https://api.github.com/repos/owner/repo/statuses/{sha}"));
    repo.insert("languages_url".into(), json!("https://api.github.com/repos/owner/repo/languages"));
    repo.insert("stargazers_url".into(), json!("https://api.github.com/repos/owner/repo/stargazers"));
    repo.insert("contributors_url".into(), json!("https://api.github.com/repos/owner/repo/contributors"));
    repo.insert("subscribers_url".into(), json!("https://api.github.com/repos/owner/repo/subscribers"));
    repo.insert("subscription_url".into(), json!("https://api.github.com/repos/owner/repo/subscription"));
    repo.insert("commits_url".into(), json!("https://api.github.com/repos/owner/repo/commits{/sha}"));
    repo.insert("git_commits_url".into(), json!("https://api.github.com/repos/owner/repo/git/commits{/sha}"));
    repo.insert("comments_url".into(), json!("https://api.github.com/repos/owner/repo/comments{/number}"));
    repo.insert("issue_comment_url".into(), json!("https://api.github.com/repos/owner/repo/issues/comments{/number}"));
    repo.insert("contents_url".into(), json!("https://api.github.com/repos/owner/repo/contents/{+path}"));
    repo.insert("compare_url".into(), json!("https://api.github.com/repos/owner/repo/compare/{base}...{head}"));
    repo.insert("merges_url".into(), json!("https://api.github.com/repos/owner/repo/merges"));
    repo.insert("archive_url".into(), json!("https://api.github.com/repos/owner/repo/{archive_format}{/ref}"));
    repo.insert("downloads_url".into(), json!("https://api.github.com/repos/owner/repo/downloads"));
    repo.insert("issues_url".into(), json!("https://api.github.com/repos/owner/repo/issues{/number}"));
    repo.insert("pulls_url".into(), json!("https://api.github.com/repos/owner/repo/pulls{/number}"));
    repo.insert("milestones_url".into(), json!("https://api.github.com/repos/owner/repo/milestones{/number}"));
    repo.insert("notifications_url".into(), json!("https://api.github.com/repos/owner/repo/notifications{?since,all,participating}"));
    repo.insert("labels_url".into(), json!("https://api.github.com/repos/owner/repo/labels{/name}"));
    repo.insert("releases_url".into(), json!("https://api.github.com/repos/owner/repo/releases{/id}"));
    repo.insert("deployments_url".into(), json!("https://api.github.com/repos/owner/repo/deployments"));
    Value::Object(repo)
}

/// Create a complete mock PR JSON that matches GitHub's API and octocrab's expectations.
pub fn mock_pr(
    number: u64,
    title: &str,
    author: &str,
    merged_at: Option<DateTime<Utc>>,
    body: Option<&str>,
    labels: Vec<&str>,
) -> Value {
    let repo = mock_repo();
    let user = mock_user(author, 100);

    let label_objects: Vec<Value> = labels
        .iter()
        .enumerate()
        .map(|(i, l)| {
            json!({
                "id": i + 1,
                "node_id": format!("L_{}", i + 1),
                "url": "https://api.github.com/repos/owner/repo/labels/label",
                "name": *l,
                "color": "fc2929",
                "default": false
            })
        })
        .collect();

    let head = json!({
        "label": "owner:feature",
        "ref": "feature",
        "sha": "abc123def456789",
        "user": user.clone(),
        "repo": repo.clone()
    });

    let base = json!({
        "label": "owner:main",
        "ref": "main",
        "sha": "def456abc789",
        "user": mock_user("owner", 1),
        "repo": repo
    });

    let links = json!({
        "self": { "href": format!("https://api.github.com/repos/owner/repo/pulls/{}", number) },
        "html": { "href": format!("https://github.com/owner/repo/pull/{}", number) },
        "issue": { "href": format!("https://api.github.com/repos/owner/repo/issues/{}", number) },
        "comments": { "href": format!("https://api.github.com/repos/owner/repo/issues/{}/comments", number) },
        "review_comments": { "href": format!("https://api.github.com/repos/owner/repo/pulls/{}/comments", number) },
        "review_comment": { "href": "https://api.github.com/repos/owner/repo/pulls/comments{/number}" },
        "commits": { "href": format!("https://api.github.com/repos/owner/repo/pulls/{}/commits", number) },
        "statuses": { "href": "https://api.github.com/repos/owner/repo/statuses/abc123def456789" }
    });

    let merged_by = if merged_at.is_some() {
        Some(mock_user("merger", 200))
    } else {
        None
    };

    // Build the PR object using a Map to avoid macro recursion limits
    let mut pr = Map::new();
    pr.insert("url".into(), json!(format!("https://api.github.com/repos/owner/repo/pulls/{}", number)));
    pr.insert("id".into(), json!(number * 1000));
    pr.insert("node_id".into(), json!(format!("PR_{}", number)));
    pr.insert("html_url".into(), json!(format!("https://github.com/owner/repo/pull/{}", number)));
    pr.insert("diff_url".into(), json!(format!("https://github.com/owner/repo/pull/{}.diff", number)));
    pr.insert("patch_url".into(), json!(format!("https://github.com/owner/repo/pull/{}.patch", number)));
    pr.insert("issue_url".into(), json!(format!("https://api.github.com/repos/owner/repo/issues/{}", number)));
    pr.insert("commits_url".into(), json!(format!("https://api.github.com/repos/owner/repo/pulls/{}/commits", number)));
    pr.insert("review_comments_url".into(), json!(format!("https://api.github.com/repos/owner/repo/pulls/{}/comments", number)));
    pr.insert("review_comment_url".into(), json!("https://api.github.com/repos/owner/repo/pulls/comments{/number}"));
    pr.insert("comments_url".into(), json!(format!("https://api.github.com/repos/owner/repo/issues/{}/comments", number)));
    pr.insert("statuses_url".into(), json!("https://api.github.com/repos/owner/repo/statuses/abc123"));
    pr.insert("number".into(), json!(number));
    pr.insert("state".into(), json!("closed"));
    pr.insert("locked".into(), json!(false));
    pr.insert("title".into(), json!(title));
    pr.insert("body".into(), json!(body));
    pr.insert("user".into(), user);
    pr.insert("labels".into(), json!(label_objects));
    pr.insert("assignee".into(), Value::Null);
    pr.insert("assignees".into(), json!([]));
    pr.insert("requested_reviewers".into(), json!([]));
    pr.insert("requested_teams".into(), json!([]));
    pr.insert("milestone".into(), Value::Null);
    pr.insert("created_at".into(), json!("2024-01-01T00:00:00Z"));
    pr.insert("updated_at".into(), json!("2024-01-15T00:00:00Z"));
    pr.insert("closed_at".into(), json!(merged_at.map(|d| d.to_rfc3339())));
    pr.insert("merged_at".into(), json!(merged_at.map(|d| d.to_rfc3339())));
    pr.insert("merge_commit_sha".into(), json!("abc123def456"));
    pr.insert("head".into(), head);
    pr.insert("base".into(), base);
    pr.insert("draft".into(), json!(false));
    pr.insert("merged".into(), json!(merged_at.is_some()));
    pr.insert("mergeable".into(), json!(true));
    pr.insert("mergeable_state".into(), json!("clean"));
    pr.insert("merged_by".into(), json!(merged_by));
    pr.insert("comments".into(), json!(0));
    pr.insert("review_comments".into(), json!(0));
    pr.insert("maintainer_can_modify".into(), json!(true));
    pr.insert("commits".into(), json!(1));
    pr.insert("additions".into(), json!(10));
    pr.insert("deletions".into(), json!(2));
    pr.insert("changed_files".into(), json!(1));
    pr.insert("_links".into(), links);

    Value::Object(pr)
}
