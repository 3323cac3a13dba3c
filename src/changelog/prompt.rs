use crate::cli::ChangelogMode;

/// Inputs the prompt templates draw from
pub struct PromptInput<'a> {
    pub diff: &'a str,
    /// Commit list, only embedded in unified mode
    pub commits: &'a str,
    /// Base for `<repo>/commit/<hash>` links
    pub repo_url: Option<&'a str>,
}

pub fn build(mode: ChangelogMode, input: &PromptInput<'_>) -> String {
    match mode {
        ChangelogMode::ByCommit => by_commit(input),
        ChangelogMode::Unified => unified(input),
    }
}

fn commit_heading(repo_url: Option<&str>) -> String {
    match repo_url {
        Some(repo) => format!(
            "### [`short-hash`]({}/commit/FULL_HASH) - Commit Subject",
            repo.trim_end_matches('/')
        ),
        None => "### `short-hash` - Commit Subject".to_string(),
    }
}

fn by_commit(input: &PromptInput<'_>) -> String {
    let heading = commit_heading(input.repo_url);
    let diff = input.diff;
    format!(
        r#"Analyze the workflow changes below. They are individual commit diffs.

Write a changelog with this structure:

## Summary
[2-3 sentences on what changed overall]

## Key Changes
- [The most important change]
- [3-5 key changes in total]

## Changes by Commit

For each commit in the diff add an entry like:

{heading}
*Author Name, Commit Date*

**Summary:** [1-2 sentences on what the commit does]

**Changes:**
- [Concrete change, naming files and functionality]
- [Next change]

<details><summary>Full commit message</summary>

```
[The full commit message when it adds detail beyond the subject]
```
</details>

---

Be specific about which workflow files were modified, what behavior changed
(jobs, schedules, permissions) and any breaking change. The reader is a
downstream system that may be affected. Do not reproduce the raw diffs, only
your analysis.

Here are the commit diffs:

{diff}
"#
    )
}

fn unified(input: &PromptInput<'_>) -> String {
    let diff = input.diff;
    let commits = input.commits;
    format!(
        r#"Analyze the unified diff below. It shows the net effect of all recent workflow changes.

Write a changelog with this structure:

## Workflow Changelog

### Summary
[2-4 sentences on the overall theme of the changes]

### Highlights
- [2-5 highlights, each prefixed with a category: feature, fix, refactor, docs, perf, security]

### What Changed

#### New Workflows
- **workflow-name.yml** - [What it does and why it was added]
[Only if workflows were added]

#### Modified Workflows
**`workflow-name.yml`**
- [Specific change and its impact]

#### Removed Workflows
- **old-workflow.yml** - [What it did and why it was removed]
[Only if workflows were removed]

### Impact Assessment
[1-2 paragraphs on effects for downstream systems, APIs, documentation or dependencies]

### Technical Details
<details><summary>View commit list</summary>

{commits}

</details>

---

Guidelines:
- Describe the net effect, not every intermediate step
- Prefer functional changes over renames, but mention significant renames
- Point out patterns shared by several changes
- Call out breaking changes, schedule and permission changes, new dependencies
- Group related changes together

Do not include raw diffs in the changelog body.

Here is the unified diff:

{diff}
"#
    )
}
