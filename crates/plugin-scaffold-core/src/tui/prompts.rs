//! Charm-style CLI prompts using cliclack

use crate::config::validate::{
    check_project_name, default_description, is_valid_domain, is_valid_email, parse_port,
};
use crate::config::{Framework, Language, ProjectConfig, ProjectDraft, DEFAULT_WEBSOCKET_PORT};
use crate::generator::ProjectGenerator;
use crate::registry::RegistryClient;
use crate::runtime::{check, PackageInstaller};
use crate::templates::resolve_template_root;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Project name offered when nothing is typed
const DEFAULT_PROJECT_NAME: &str = "my-risu-plugin";

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    pub name: Option<String>,
    pub description: Option<String>,
    pub framework: Option<Framework>,
    pub language: Option<Language>,
    pub port: Option<u16>,

    /// Setting a domain turns the proxy on
    pub proxy_domain: Option<String>,
    pub proxy_email: Option<String>,

    /// Local directory to use for templates instead of the bundled ones
    pub template_dir: Option<PathBuf>,

    pub skip_install: bool,
    pub skip_registry_check: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Run the CLI with interactive prompts
pub async fn run(args: CreateArgs) -> Result<()> {
    cliclack::intro("create-risu-plugin")?;

    let template_root = resolve_template_root(args.template_dir.as_deref());

    // Step 1: Collect choices
    let draft = collect_draft(&args).await?;

    // Step 2: Validate against the working directory
    let base_dir = std::env::current_dir().context("Cannot determine the current directory")?;
    let config = draft.validate(&base_dir)?;
    let generator = ProjectGenerator::new(config, template_root);
    if args.template_dir.is_some() {
        cliclack::log::info(format!(
            "Using local templates from {}",
            generator.selector().root().display()
        ))?;
    }

    // Step 3: Compose the project
    create_project(&generator).await?;

    // Step 4: Install dependencies
    let installed = install_dependencies(&generator, &args).await?;

    // Step 5: Show next steps
    print_next_steps(generator.config(), installed)?;

    Ok(())
}

async fn collect_draft(args: &CreateArgs) -> Result<ProjectDraft> {
    let project_name = prompt_project_name(args)?;
    if !args.skip_registry_check {
        check_registry(&project_name).await?;
    }

    let description = prompt_description(args, &project_name)?;
    let framework = prompt_framework(args)?;
    let language = prompt_language(args)?;
    let websocket_port = prompt_port(args)?;
    let (use_proxy, proxy_domain, proxy_email) = prompt_proxy(args)?;

    Ok(ProjectDraft {
        project_name: Some(project_name),
        description: Some(description),
        framework: Some(framework),
        language: Some(language),
        websocket_port: Some(websocket_port),
        use_proxy,
        proxy_domain,
        proxy_email,
    })
}

fn prompt_project_name(args: &CreateArgs) -> Result<String> {
    if let Some(name) = &args.name {
        check_project_name(name).map_err(anyhow::Error::msg)?;
        cliclack::log::info(format!("Project name: {}", name))?;
        return Ok(name.clone());
    }
    if args.yes {
        return Ok(DEFAULT_PROJECT_NAME.to_string());
    }

    let name: String = cliclack::input("Project name")
        .placeholder(DEFAULT_PROJECT_NAME)
        .default_input(DEFAULT_PROJECT_NAME)
        .validate(|input: &String| check_project_name(input))
        .interact()?;
    Ok(name)
}

/// Warn, never block, when the name is already published
async fn check_registry(project_name: &str) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Checking the npm registry...");

    let client = RegistryClient::new();
    if !client.package_exists(project_name).await {
        spinner.stop(format!("'{}' is available on npm", project_name));
        return Ok(());
    }

    spinner.stop(format!("'{}' is already published on npm", project_name));
    if let Some(info) = client.package_info(project_name).await {
        let mut lines = vec![format!(
            "{}@{}",
            info.name,
            info.version.as_deref().unwrap_or("unknown")
        )];
        if let Some(description) = info.description {
            lines.push(description);
        }
        if let Some(author) = info.author {
            lines.push(format!("by {}", author));
        }
        cliclack::log::warning(lines.join("\n"))?;
    }
    cliclack::log::remark("You can still use the name locally, but publishing it will fail.")?;
    Ok(())
}

fn prompt_description(args: &CreateArgs, project_name: &str) -> Result<String> {
    let default = default_description(project_name);
    if let Some(description) = args.description.as_ref().filter(|d| !d.trim().is_empty()) {
        return Ok(description.clone());
    }
    if args.yes {
        return Ok(default);
    }

    let description: String = cliclack::input("Description")
        .placeholder(&default)
        .default_input(&default)
        .interact()?;
    Ok(description)
}

fn prompt_framework(args: &CreateArgs) -> Result<Framework> {
    if let Some(framework) = args.framework {
        if !framework.is_available() {
            cliclack::log::warning(format!("{} templates are not available yet", framework))?;
        }
        return Ok(framework);
    }
    if args.yes {
        return Ok(Framework::Vanilla);
    }

    let mut select = cliclack::select("Select a framework").initial_value(Framework::Vanilla);
    for framework in [Framework::Vanilla, Framework::React, Framework::Svelte] {
        if framework.is_available() {
            select = select.item(framework, framework.display_name(), "");
        }
    }
    Ok(select.interact()?)
}

fn prompt_language(args: &CreateArgs) -> Result<Language> {
    if let Some(language) = args.language {
        if !language.is_available() {
            cliclack::log::warning(format!("{} templates are not available yet", language))?;
        }
        return Ok(language);
    }

    let available: Vec<Language> = [Language::JavaScript, Language::TypeScript]
        .into_iter()
        .filter(Language::is_available)
        .collect();
    if args.yes || available.len() == 1 {
        let language = available.first().copied().unwrap_or(Language::JavaScript);
        cliclack::log::info(format!("Language: {}", language.display_name()))?;
        return Ok(language);
    }

    let mut select = cliclack::select("Select a language");
    for language in available {
        select = select.item(language, language.display_name(), language.code());
    }
    Ok(select.interact()?)
}

fn prompt_port(args: &CreateArgs) -> Result<u16> {
    if let Some(port) = args.port {
        return Ok(port);
    }
    if args.yes {
        return Ok(DEFAULT_WEBSOCKET_PORT);
    }

    let default = DEFAULT_WEBSOCKET_PORT.to_string();
    let input: String = cliclack::input("Dev server WebSocket port")
        .placeholder(&default)
        .default_input(&default)
        .validate(|input: &String| parse_port(input).map(|_| ()))
        .interact()?;
    parse_port(&input).map_err(anyhow::Error::msg)
}

type ProxyChoice = (bool, Option<String>, Option<String>);

fn prompt_proxy(args: &CreateArgs) -> Result<ProxyChoice> {
    if let Some(domain) = &args.proxy_domain {
        return Ok((true, Some(domain.clone()), args.proxy_email.clone()));
    }
    if args.yes {
        return Ok((false, None, None));
    }

    cliclack::note(
        "What is Caddy?",
        "Caddy is a web server that handles HTTPS certificates for a custom domain.\n\
         It forwards that domain to the local dev server, so RISU AI can reach\n\
         hot reload over wss:// when it does not run on this machine.",
    )?;
    let use_proxy: bool = cliclack::confirm("Serve the dev server through a Caddy HTTPS proxy?")
        .initial_value(false)
        .interact()?;
    if !use_proxy {
        return Ok((false, None, None));
    }

    let domain: String = cliclack::input("Proxy domain")
        .placeholder("dev.example.com")
        .validate(|input: &String| {
            if is_valid_domain(input.trim()) {
                Ok(())
            } else {
                Err("Enter a valid domain (e.g. dev.example.com).")
            }
        })
        .interact()?;

    let email: String = cliclack::input("Email for TLS certificates (optional)")
        .placeholder("you@example.com")
        .required(false)
        .validate(|input: &String| {
            let input = input.trim();
            if input.is_empty() || is_valid_email(input) {
                Ok(())
            } else {
                Err("Enter a valid email address or leave it empty.")
            }
        })
        .interact()?;

    let email = Some(email.trim().to_string()).filter(|e| !e.is_empty());
    Ok((true, Some(domain.trim().to_string()), email))
}

async fn create_project(generator: &ProjectGenerator) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");

    match generator.compose().await {
        Ok(project) => {
            spinner.stop(format!(
                "Created {} files in {}",
                project.files.len(),
                project.target_dir.display()
            ));
            Ok(())
        }
        Err(e) if e.is_preflight() => {
            spinner.error("Cannot create project");
            Err(e.into())
        }
        Err(e) => {
            spinner.error("Failed to create project; the directory may be incomplete");
            Err(e.into())
        }
    }
}

/// Returns whether dependencies were installed
async fn install_dependencies(generator: &ProjectGenerator, args: &CreateArgs) -> Result<bool> {
    if args.skip_install {
        cliclack::log::info("Skipping dependency installation")?;
        return Ok(false);
    }

    let runtimes = match check::check_toolchain() {
        Ok(runtimes) => runtimes,
        Err(e) => {
            cliclack::log::warning(format!("{}\nInstall dependencies manually.", e))?;
            return Ok(false);
        }
    };
    let detected: Vec<String> = runtimes
        .iter()
        .map(|r| format!("{} {}", r.name, r.version.as_deref().unwrap_or("unknown")))
        .collect();

    let installer = PackageInstaller::npm();
    cliclack::log::step(format!(
        "Running {} ({})",
        installer.command_line(),
        detected.join(", ")
    ))?;
    installer.install(generator.config().target_dir()).await?;
    cliclack::log::success("Dependencies installed")?;
    Ok(true)
}

fn next_steps(project_dir: &Path, project_name: &str, installed: bool) -> Vec<String> {
    let dir = project_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| project_name.to_string());

    let mut steps = vec![format!("cd {}", dir)];
    if !installed {
        steps.push("npm install".to_string());
    }
    steps.push("npm run dev".to_string());
    steps.push("npm run build".to_string());
    steps
}

fn print_next_steps(config: &ProjectConfig, installed: bool) -> Result<()> {
    let steps = next_steps(config.target_dir(), config.project_name(), installed);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    if let Some(proxy) = config.proxy() {
        println!();
        println!(
            "  Dev server will be reachable at https://{} through Caddy",
            proxy.domain
        );
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
