//! # adze CLI Entry Point
//!
//! Parses CLI arguments using clap and routes commands to the library
//! modules.
//!
//! ## Command Structure
//!
//! - **Filesystem**: `list`, `count`, `link`
//! - **Codegen**: `enum`, `new-module`
//! - **Build**: `cmake`, `doc`
//! - **Repository**: `repo`, `redirect`, `shebang`
//! - **System**: `pkg`, `completion`

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use inquire::Text;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use adze::cmake;
use adze::config;
use adze::cpp;
use adze::doxy;
use adze::git;
use adze::linecount;
use adze::link;
use adze::pacman;
use adze::redirect;
use adze::scaffold;
use adze::shebang;
use adze::ui;
use adze::walk;

#[derive(Parser)]
#[command(name = "adze")]
#[command(about = "A toolbox of C/C++ developer utilities", version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
struct Cli {
    /// Silence everything below errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List directory contents
    List {
        /// Directory to list
        path: PathBuf,
        /// Recurse into subdirectories
        #[arg(short, long)]
        recursive: bool,
        /// Follow symbolic links while recursing
        #[arg(long)]
        follow_symlinks: bool,
        /// Skip entries whose path matches this pattern
        #[arg(long)]
        ignore: Option<String>,
        /// Only print entries whose path matches this pattern
        #[arg(long = "match")]
        matching: Option<String>,
    },
    /// Count lines in C/C++ source files
    Count {
        /// Files to count lines on; directory contents are searched
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Count only productive (non-blank) lines
        #[arg(short, long)]
        productive_only: bool,
        /// Only count files whose path matches this pattern
        #[arg(long = "match")]
        matching: Option<String>,
        /// Search directories recursively
        #[arg(short, long)]
        recursive: bool,
    },
    /// Extract a C++ enum and emit generated source
    #[command(name = "enum")]
    EnumGen {
        /// Enum type name to look for
        name: String,
        /// Source file to scan
        file: PathBuf,
        /// Emit the name lookup table instead of the declaration
        #[arg(long)]
        table: bool,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run CMake configure/build steps
    Cmake {
        #[command(subcommand)]
        op: CmakeOp,
    },
    /// Generate documentation using Doxygen
    Doc {
        /// Doxyfile attribute overrides
        #[arg(long = "set", value_name = "NAME=VALUE")]
        sets: Vec<String>,
    },
    /// Install or search packages with the system package manager
    Pkg {
        #[command(subcommand)]
        op: PkgOp,
    },
    /// Git repository helpers
    Repo {
        #[command(subcommand)]
        op: RepoOp,
    },
    /// Create a symbolic link
    Link {
        /// The target that the link will point to
        target: PathBuf,
        /// The path/name of the link to create
        link_name: PathBuf,
        /// Suppress the error when symlink permissions are missing
        #[arg(long)]
        ignore_perms: bool,
    },
    /// Replace the shebang in a shell script
    Shebang {
        /// Path to the shell script file
        path: PathBuf,
        /// What to replace the shebang with
        shebang: String,
        /// Recursively look for shell script (.sh) files
        #[arg(long)]
        recursive: bool,
    },
    /// Generate scripts that redirect into another script
    Redirect {
        /// Path to the script to redirect into
        script: PathBuf,
        /// Name/path for the generated scripts; the extension is replaced
        name: PathBuf,
        /// Generate a shell (.sh) script
        #[arg(long)]
        shell: bool,
        /// Generate a batch (.bat) script
        #[arg(long)]
        batch: bool,
        /// Path to the repo root directory [env: REPO_ROOT_PATH]
        #[arg(long)]
        repo_root: Option<PathBuf>,
    },
    /// Scaffold a new C++ library module
    NewModule {
        /// Module name (interactive if omitted)
        name: Option<String>,
        /// Directory to create the module in
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Generate shell completion scripts
    Completion { shell: Shell },
}

#[derive(Subcommand)]
enum CmakeOp {
    /// Configure the build directory
    Generate {
        /// CMake cache definitions
        #[arg(short = 'D', value_name = "NAME=VALUE")]
        define: Vec<String>,
        /// CMake generator
        #[arg(short = 'G', long)]
        generator: Option<String>,
        /// Source directory
        #[arg(short = 'S', long, default_value = ".")]
        source_root: PathBuf,
        /// Build directory
        #[arg(short = 'B', long)]
        build_root: Option<PathBuf>,
        /// Compiler to export via CC/CXX (clang or gcc)
        #[arg(long)]
        compiler: Option<String>,
        /// Keep cmake developer warnings
        #[arg(long)]
        dev: bool,
    },
    /// Build a configured build directory
    Build {
        /// Build directory
        #[arg(short = 'B', long)]
        build_root: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum PkgOp {
    /// Install a package
    Install {
        /// Package name
        package: String,
    },
    /// Search for a package
    Search {
        /// Query string
        query: String,
    },
}

#[derive(Subcommand)]
enum RepoOp {
    /// Show staged and unstaged changes
    Status,
    /// List branches, or create one when a name is given
    Branch {
        /// Branch name to create
        name: Option<String>,
    },
    /// Delete a branch
    DeleteBranch {
        /// Branch name
        name: String,
        /// Delete even when the branch is not fully merged
        #[arg(long)]
        force: bool,
    },
    /// Rename the current branch
    RenameBranch {
        /// New branch name
        new_name: String,
    },
    /// Check out a branch
    Checkout {
        /// Branch name
        name: String,
    },
    /// Stage files matching a pattern
    Add {
        /// Pathspec to stage
        pattern: String,
    },
    /// Commit staged changes
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
    },
    /// Push to the remote
    Push {
        /// Set the upstream for the current branch
        #[arg(long)]
        set_upstream: bool,
    },
    /// Pull from the remote
    Pull,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.quiet {
        ui::set_log_level(ui::LogLevel::Error);
    } else if cli.verbose {
        ui::set_log_level(ui::LogLevel::Debug);
    }

    match cli.command {
        Commands::List {
            path,
            recursive,
            follow_symlinks,
            ignore,
            matching,
        } => list_entries(&path, recursive, follow_symlinks, ignore, matching),

        Commands::Count {
            paths,
            productive_only,
            matching,
            recursive,
        } => {
            let pattern = matching
                .map(|p| Regex::new(&p))
                .transpose()
                .context("invalid --match pattern")?;
            let options = linecount::CountOptions {
                productive_only,
                pattern,
                recursive,
            };
            let result = linecount::count_lines(&paths, &options)?;
            if cli.quiet {
                println!("{}", result.lines);
            } else {
                let mut table = ui::Table::new(&["Metric", "Count"]);
                table.add_row(vec!["Files".dimmed().to_string(), result.files.to_string()]);
                table.add_row(vec!["Lines".green().to_string(), result.lines.to_string()]);
                table.print();
            }
            Ok(())
        }

        Commands::EnumGen {
            name,
            file,
            table,
            output,
        } => emit_enum(&name, &file, table, output),

        Commands::Cmake { op } => match op {
            CmakeOp::Generate {
                define,
                generator,
                source_root,
                build_root,
                compiler,
                dev,
            } => {
                let config = config::load()?;
                let build_config = config.build.unwrap_or_default();

                let compiler = compiler
                    .or(build_config.compiler)
                    .map(|name| {
                        cmake::Compiler::from_name(&name)
                            .with_context(|| format!("unknown compiler '{}'", name))
                    })
                    .transpose()?;

                let options = cmake::GenerateOptions {
                    definitions: define.iter().map(|d| cmake::CMakeDef::parse(d)).collect(),
                    generator: generator
                        .or(build_config.generator)
                        .unwrap_or_else(|| cmake::DEFAULT_GENERATOR.to_string()),
                    source_root,
                    build_root: build_root
                        .or(build_config.build_root)
                        .unwrap_or_else(|| PathBuf::from(cmake::DEFAULT_BUILD_ROOT)),
                    compiler,
                    dev_output: dev,
                    ..cmake::GenerateOptions::default()
                };
                cmake::generate(&options)
            }
            CmakeOp::Build { build_root } => {
                let config = config::load()?;
                let build_root = build_root
                    .or(config.build.unwrap_or_default().build_root)
                    .unwrap_or_else(|| PathBuf::from(cmake::DEFAULT_BUILD_ROOT));
                cmake::build(&build_root)
            }
        },

        Commands::Doc { sets } => {
            let mut overrides = Vec::new();
            for raw in &sets {
                let attr = doxy::DoxygenAttribute::parse(raw)
                    .with_context(|| format!("invalid --set value '{}'", raw))?;
                overrides.push(attr);
            }
            doxy::generate_docs(&overrides)
        }

        Commands::Pkg { op } => {
            let manager = pacman::detect()?;
            match op {
                PkgOp::Install { package } => {
                    ui::log_info(format!("Installing '{}' via {}", package, manager.name()));
                    if manager.install(&package)? {
                        println!("{} Installed {}", "✓".green(), package.bold());
                        Ok(())
                    } else {
                        ui::log_error(format!("{} failed to install {}", manager.name(), package));
                        std::process::exit(1);
                    }
                }
                PkgOp::Search { query } => {
                    let listing = manager.search(&query)?;
                    if listing.trim().is_empty() {
                        println!("{} No results found for '{}'", "x".red(), query);
                    } else {
                        print!("{}", listing);
                    }
                    Ok(())
                }
            }
        }

        Commands::Repo { op } => run_repo_op(op, cli.quiet),

        Commands::Link {
            target,
            link_name,
            ignore_perms,
        } => link::create_symlink(&target, &link_name, ignore_perms),

        Commands::Shebang {
            path,
            shebang,
            recursive,
        } => {
            let path = path
                .canonicalize()
                .with_context(|| format!("cannot find {}", path.display()))?;
            let normalized = shebang::normalize_shebang(&shebang);
            let changed = shebang::replace_shebangs(&path, &normalized, recursive)?;
            ui::log_info(format!("Rewrote {} file(s)", changed));
            Ok(())
        }

        Commands::Redirect {
            script,
            name,
            shell,
            batch,
            repo_root,
        } => {
            let repo_root = repo_root
                .or_else(|| std::env::var_os("REPO_ROOT_PATH").map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("."));
            let written = redirect::generate_redirects(
                &script,
                &name,
                &repo_root,
                redirect::RedirectOptions { shell, batch },
            )?;
            for path in &written {
                println!("{} Wrote {}", "✓".green(), path.display());
            }
            Ok(())
        }

        Commands::NewModule { name, root } => {
            let name = match name {
                Some(name) => name,
                None => Text::new("Module name?").prompt()?,
            };
            scaffold::new_module(&name, &root)
        }

        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
            Ok(())
        }
    }
}

fn list_entries(
    path: &Path,
    recursive: bool,
    follow_symlinks: bool,
    ignore: Option<String>,
    matching: Option<String>,
) -> Result<()> {
    let config = config::load()?;

    let mut ignore_patterns: Vec<Regex> = Vec::new();
    if let Some(raw) = ignore {
        ignore_patterns.push(Regex::new(&raw).context("invalid --ignore pattern")?);
    }
    for raw in config.walk.map(|w| w.ignore).unwrap_or_default() {
        ignore_patterns.push(
            Regex::new(&raw).with_context(|| format!("invalid ignore pattern '{}'", raw))?,
        );
    }

    let matcher = matching
        .map(|p| Regex::new(&p))
        .transpose()
        .context("invalid --match pattern")?;

    let mut iter = walk::DirectoryIterator::new(path)
        .recursive(recursive)
        .follow_symlinks(follow_symlinks);
    if !ignore_patterns.is_empty() {
        iter = iter.ignore(move |p: &Path| {
            let s = p.to_string_lossy();
            ignore_patterns.iter().any(|re| re.is_match(&s))
        });
    }

    let mut count: usize = 0;
    for entry in iter {
        let entry = entry?;
        if let Some(re) = &matcher
            && !re.is_match(&entry.to_string_lossy())
        {
            continue;
        }
        println!("{}", entry.display());
        count += 1;
    }
    ui::log_debug(format!("{} entries", count));
    Ok(())
}

fn emit_enum(name: &str, file: &Path, table: bool, output: Option<PathBuf>) -> Result<()> {
    let source =
        fs::read_to_string(file).with_context(|| format!("cannot read {}", file.display()))?;

    let Some(parsed) = cpp::enums::Enum::parse_from_source(name, &source) else {
        ui::log_error(format!(
            "enum class '{}' not found in {}",
            name,
            file.display()
        ));
        std::process::exit(1);
    };

    let rendered = if table {
        parsed.render_conversion_table()
    } else {
        parsed.render_declaration()
    };

    match output {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("cannot write {}", path.display()))?;
            println!("{} Wrote {}", "✓".green(), path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn run_repo_op(op: RepoOp, quiet: bool) -> Result<()> {
    let repo_root = PathBuf::from(".");
    if !git::is_local_repo(&repo_root) {
        ui::log_warn("Current directory does not look like a git repository");
    }

    let ok = match op {
        RepoOp::Status => {
            let Some(status) = git::status(&repo_root, true)? else {
                std::process::exit(1);
            };
            let mut table = ui::Table::new(&["State", "Change", "File"]);
            for change in &status.staged {
                table.add_row(vec![
                    "staged".green().to_string(),
                    format!("{:?}", change.kind).to_lowercase(),
                    change.file.display().to_string(),
                ]);
            }
            for change in &status.unstaged {
                table.add_row(vec![
                    "unstaged".yellow().to_string(),
                    format!("{:?}", change.kind).to_lowercase(),
                    change.file.display().to_string(),
                ]);
            }
            if status.staged.is_empty() && status.unstaged.is_empty() {
                println!("{} Working tree clean", "✓".green());
            } else {
                table.print();
            }
            true
        }
        RepoOp::Branch { name: Some(name) } => git::create_branch(&name, &repo_root, quiet)?,
        RepoOp::Branch { name: None } => {
            let Some(list) = git::branches(&repo_root, true)? else {
                std::process::exit(1);
            };
            for branch in &list.branches {
                if *branch == list.current {
                    println!("{} {}", "*".green(), branch.bold());
                } else {
                    println!("  {}", branch);
                }
            }
            true
        }
        RepoOp::DeleteBranch { name, force } => {
            git::delete_branch(&name, force, &repo_root, quiet)?
        }
        RepoOp::RenameBranch { new_name } => git::rename_branch(&new_name, &repo_root, quiet)?,
        RepoOp::Checkout { name } => git::checkout(&name, &repo_root, quiet)?,
        RepoOp::Add { pattern } => git::add(&pattern, &repo_root, quiet)?,
        RepoOp::Commit { message } => git::commit(&message, &repo_root, quiet)?,
        RepoOp::Push { set_upstream } => git::push(set_upstream, "origin", &repo_root, quiet)?,
        RepoOp::Pull => git::pull(&repo_root, quiet)?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
