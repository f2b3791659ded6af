//! Git push script for a brand-new repository. Purely local, no model call.

const DEFAULT_REPO_NAME: &str = "my-awesome-project";
const PLACEHOLDER_REMOTE: &str = "https://github.com/YOUR_USER/YOUR_REPO.git";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitOnboarding {
    repo_url: Option<String>,
}

impl GitOnboarding {
    pub fn new(repo_url: Option<&str>) -> Self {
        let repo_url = repo_url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string);
        Self { repo_url }
    }

    /// Last path segment of the URL, trailing `/` and `.git` suffix removed.
    pub fn repo_name(&self) -> String {
        self.repo_url
            .as_deref()
            .and_then(|url| url.trim_end_matches('/').rsplit('/').next())
            .map(|segment| segment.strip_suffix(".git").unwrap_or(segment).to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_REPO_NAME.to_string())
    }

    pub fn remote(&self) -> &str {
        self.repo_url.as_deref().unwrap_or(PLACEHOLDER_REMOTE)
    }

    pub fn commands(&self) -> String {
        [
            "# 1. Initialize local repository".to_string(),
            "git init".to_string(),
            String::new(),
            "# 2. Add all files to staging".to_string(),
            "git add .".to_string(),
            String::new(),
            "# 3. Create initial commit".to_string(),
            "git commit -m \"chore: initial commit via AllNoop\"".to_string(),
            String::new(),
            "# 4. Branch and Remote setup".to_string(),
            "git branch -M main".to_string(),
            format!("git remote add origin {}", self.remote()),
            String::new(),
            "# 5. Push to GitHub".to_string(),
            "git push -u origin main".to_string(),
        ]
        .join("\n")
    }
}
