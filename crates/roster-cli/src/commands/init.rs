//! Initialize a new Roster project

use anyhow::Result;
use roster_core::config::CONFIG_FILE;
use std::fs;
use std::path::Path;

/// Run the init command
pub async fn run(path: &str, name: Option<&str>) -> Result<()> {
    let project_dir = Path::new(path);

    if !project_dir.exists() {
        fs::create_dir_all(project_dir)?;
    }

    let abs_path = project_dir.canonicalize()?;

    // Derive project name from directory name if not provided
    let project_name = match name {
        Some(n) => n.to_string(),
        None => abs_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("Could not determine project name from path"))?,
    };

    if project_dir.join(CONFIG_FILE).exists() {
        anyhow::bail!(
            "Directory '{}' already contains a {}",
            project_dir.display(),
            CONFIG_FILE
        );
    }

    tracing::info!("Creating new Roster project: {}", project_name);

    let config = format!(
        r#"# Roster Project Configuration
name: {project_name}
version: "0.1.0"

# Ages are computed as of this date, not today
reference_date: 2024-03-01

source:
  path: ./data/member-data.txt
  delimiter: "|"

# JSON-lines output for local testing. To load into PostgreSQL instead:
#
# sink:
#   type: postgres
#   url: "postgres://user:pass@db_service:5432"   # remote mode only
#   database: etl_db
#   collection: employees
sink:
  type: file
  path: ./data/employees.jsonl

runtime:
  mode: local
  local:
    data_dir: ".roster/data"
    port: 5433

error_handling:
  on_error: stop_on_error
"#
    );
    fs::write(project_dir.join(CONFIG_FILE), config)?;

    let gitignore = r#"# Roster local data
.roster/

# Output files
data/employees*.jsonl

# IDE
.idea/
.vscode/
*.swp
"#;
    fs::write(project_dir.join(".gitignore"), gitignore)?;

    fs::create_dir_all(project_dir.join("data"))?;
    let sample_data = "\
John|Doe|Company Inc.|01051985|55000|123 Elm St|Elmwood|CA|90210|123456789|987654321|john.doe@example.com
Jane|Smith|Another Co.||120000|456 Oak St|Oakwood|NY|10001|234567890|876543210|jane.smith@example.com
Carol|Williams|Third Pty Ltd|7021990|49999.99|9 Bay Rd|Bayview|NSW|2000|0299990000|0400000000|carol@example.com
";
    fs::write(project_dir.join("data/member-data.txt"), sample_data)?;

    tracing::info!(
        "✓ Created project '{}' at {}",
        project_name,
        abs_path.display()
    );
    tracing::info!("Next steps:");
    if path != "." {
        tracing::info!("  cd {}", project_dir.display());
    }
    tracing::info!("  roster validate    # Check configuration and data");
    tracing::info!("  roster run         # Transform and load");

    Ok(())
}
