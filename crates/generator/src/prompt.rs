//! Prompt text sent to the oracle.

use std::fmt::Write as _;

/// Conventions every generated repository method should follow
pub const IMPLEMENTATION_GUIDELINES: &str = r#"## Implementation Guidelines
- Build entities through their New function; never instantiate entity structs directly.
- For single-record lookups by ID, consult the cache first and only query the DB on a miss.
- Cache keys use the form "EntityType:EntityID".
- When an argument has an entity type (for example `id entity.ChannelID`) and no row exists, return an error.
- When an argument has a basic type (for example `id string`) and no row exists, return nil or an empty slice instead of an error.

## Error Handling
`query := db.New(tx)` only wraps the transaction, so errors are plain database/sql errors such as sql.ErrNoRows.

## Cache
Infrastructure code may use the cache declared in pkg/infra/cache.go:

package infra

import "time"

type Cache interface {
	Set(k string, x interface{}, d time.Duration)
	Get(k string) (interface{}, bool)
	Delete(k string)
}

## Implementation Pattern
query := db.New(tx)
// The cache is optional for some methods.
cacheKey := fmt.Sprintf("EntityType:%d", id)
if cachedEntity, found := repo.Cache.Get(cacheKey); found {
    // return the cached entity
}

// call the generated query, e.g. query.GetSomething(ctx)

// convert the row with the entity's New function

// store the entity with a suitable lifetime
repo.Cache.Set(cacheKey, entity, 10*time.Minute)"#;

const SQLC_EXAMPLES: &str = r#"-- name: GetAuthor :one
SELECT * FROM authors
WHERE id = $1 LIMIT 1;

-- name: UpsertAuthorName :one
UPDATE author
SET
  name = CASE WHEN @set_name::bool
    THEN @name::text
    ELSE name
    END
RETURNING *;

-- name: ListAuthorsByIDs :many
SELECT * FROM authors
WHERE id = ANY($1::int[]);

-- name: CreateAuthor :one
INSERT INTO authors (
  name, bio
) VALUES (
  $1, $2
)
RETURNING *;

-- name: UpdateAuthor :exec
UPDATE authors
  SET name = $2,
      bio = $3
WHERE id = $1;

-- name: DeleteAuthor :exec
DELETE FROM authors
WHERE id = $1;"#;

/// A verbatim file included in a prompt, labelled by its project path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFile {
    pub label: String,
    pub content: String,
}

fn push_fenced(out: &mut String, content: &str) {
    out.push_str("```\n");
    out.push_str(content.trim_end());
    out.push_str("\n```\n");
}

/// Everything shared by the per-method prompts of the program stage
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    pub interface_text: String,
    pub struct_text: String,
    pub assertion_text: String,
    /// sqlc output the implementation talks to
    pub db_files: Vec<ReferenceFile>,
    /// Rendered entity catalog
    pub catalog: String,
    pub tx_provider: String,
    pub guidelines: String,
    pub go_mod: String,
    /// Package directory of the target file, relative to the project root
    pub package_dir: String,
    pub entities_dir: String,
    pub db_dir: String,
    pub infra_dir: String,
}

impl GenerationContext {
    pub fn method_prompt(&self, method: &str) -> String {
        let mut out = String::new();
        out.push_str("# Instruction\nImplement the requested function in Go.\n\n");

        out.push_str("# Function to Implement\n");
        let _ = writeln!(out, "Implement the {method} method of the interface below.\n");
        out.push_str("Interface definition:\n");
        push_fenced(&mut out, &self.interface_text);
        out.push_str("\nImplementation struct definition:\n");
        push_fenced(&mut out, &format!("{}\n\n{}", self.struct_text, self.assertion_text));

        out.push_str("# DB\nUse the code below to talk to the database.\n");
        for file in &self.db_files {
            let _ = writeln!(out, "## {}", file.label);
            push_fenced(&mut out, &file.content);
        }

        out.push_str(&self.catalog);
        out.push('\n');

        out.push_str("# Transactions\n");
        out.push_str(self.tx_provider.trim_end());
        out.push_str("\n\n");

        out.push_str(self.guidelines.trim_end());
        out.push_str("\n\n");

        out.push_str("# Output Schema\n");
        out.push_str("Return JSON with these properties:\n");
        out.push_str("- code (string): the implemented function, starting at the func keyword. No import statements.\n");
        out.push_str("- import (string): the imports the function needs, written as `import (` ... `)`.\n");
        out.push_str("- doccomment (string): the documentation comment placed before the function.\n\n");

        out.push_str("# Module\n");
        push_fenced(&mut out, &self.go_mod);
        let _ = writeln!(out, "Your implementation is in the root/{} package.", self.package_dir);

        out.push_str("# Directory Structure\n");
        let _ = writeln!(out, "entity is in the root/{} package.", self.entities_dir);
        let _ = writeln!(out, "db is in the root/{} package.", self.db_dir);
        let _ = writeln!(
            out,
            "The implementation file may live in a subdirectory of {}.",
            self.infra_dir
        );
        out
    }
}

/// Shared context of the query stage
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    pub interface_text: String,
    pub schema: String,
    pub catalog: String,
}

impl QueryContext {
    pub fn method_prompt(&self, method: &str) -> String {
        let mut out = String::new();
        out.push_str("# Instruction\n");
        out.push_str("Write the SQL queries needed to implement the given function of the interface below.\n");
        out.push_str("The queries are compiled with sqlc, so they must follow sqlc conventions.\n\n");

        out.push_str("# Function to be implemented\n");
        push_fenced(&mut out, &self.interface_text);
        let _ = writeln!(out, "\nThe function to implement is {method}.\n");

        out.push_str("# Important Notes\n");
        out.push_str("Only SQL is generated here; the Go implementation is written separately and calls these queries.\n");
        out.push_str("Keep queries efficient and avoid N+1 access patterns.\n");
        out.push_str("Prefer few queries, but use several when the function needs them.\n\n");

        out.push_str("# sqlc\n");
        out.push_str("Every query starts with an sqlc annotation comment carrying its name and a result tag such as :one.\n");
        out.push_str("The database is PostgreSQL. Prefer @variable_name placeholders so sqlc can name parameters.\n\n");
        out.push_str(SQLC_EXAMPLES);
        out.push_str("\n\n");

        out.push_str("# DB Schema\nGenerate the queries against this schema:\n");
        out.push_str(self.schema.trim_end());
        out.push_str("\n\n");

        out.push_str(&self.catalog);
        out.push('\n');

        out.push_str("# Output Format\n");
        out.push_str("Return an array named \"queries\" of strings, one SQL query per element.\n");
        out.push_str("Each query must start with its sqlc annotation comment.\n");
        out
    }
}
