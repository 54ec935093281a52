//! Command-line arguments.

use authctl_core::{ListOptions, Order, OrganizationId};
use authctl_directory::{DomainState, OAuthConnectionType};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line client for the authorization platform.
#[derive(Debug, Parser)]
#[command(name = "authctl", version, about, long_about = None)]
pub struct Cli {
    /// Profile store to use instead of ~/.authctl.json.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Deadline for each API request, in seconds.
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Log more (-v for info, -vv for debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure a first profile and make it active.
    Init(InitArgs),
    /// Manage connection profiles.
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Manage organizations.
    #[command(subcommand)]
    Organization(OrganizationCommand),
    /// Manage OAuth credentials.
    #[command(subcommand, name = "oauth-credential")]
    OAuthCredential(OAuthCredentialCommand),
    /// Fine-grained authorization: resource types, resources, relations and schemas.
    #[command(subcommand)]
    Fga(FgaCommand),
}

/// Arguments of `init`. Missing values are prompted for.
#[derive(Debug, Clone, Default, Args)]
pub struct InitArgs {
    /// API key.
    #[arg(long)]
    pub api_key: Option<String>,
    /// Profile name, e.g. john-local-dev.
    #[arg(long)]
    pub name: Option<String>,
    /// Environment type, e.g. Production or Sandbox.
    #[arg(long = "type")]
    pub environment_type: Option<String>,
    /// API endpoint override.
    #[arg(long)]
    pub endpoint: Option<String>,
}

/// Profile commands.
#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Add a profile. Without arguments, asks for each value.
    Add(ProfileAddArgs),
    /// Remove a profile.
    Remove {
        /// Profile name.
        name: Option<String>,
    },
    /// Make a profile active.
    Switch {
        /// Profile name.
        name: Option<String>,
    },
    /// List profiles.
    List,
}

/// Arguments of `profile add`.
#[derive(Debug, Clone, Default, Args)]
pub struct ProfileAddArgs {
    /// Profile name.
    pub name: Option<String>,
    /// API key; required when a name is given.
    pub api_key: Option<String>,
    /// API endpoint override.
    #[arg(value_name = "ENDPOINT")]
    pub endpoint_arg: Option<String>,
    /// Environment type, e.g. Production or Sandbox.
    #[arg(long = "type")]
    pub environment_type: Option<String>,
    /// API endpoint override.
    #[arg(long)]
    pub endpoint: Option<String>,
}

/// Pagination flags shared by list commands.
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Maximum number of results.
    #[arg(long, default_value_t = 10)]
    pub limit: u32,
    /// Return results before this cursor.
    #[arg(long)]
    pub before: Option<String>,
    /// Return results after this cursor.
    #[arg(long)]
    pub after: Option<String>,
    /// Sort order (asc or desc).
    #[arg(long)]
    pub order: Option<Order>,
}

impl From<ListArgs> for ListOptions {
    fn from(args: ListArgs) -> Self {
        Self {
            limit: Some(args.limit),
            before: args.before,
            after: args.after,
            order: args.order,
        }
    }
}

/// Organization commands.
#[derive(Debug, Subcommand)]
pub enum OrganizationCommand {
    /// Create an organization, e.g. `create FooCorp foo-corp.com pending`.
    Create {
        /// Display name.
        name: Option<String>,
        /// Domain to attach.
        domain: Option<String>,
        /// Domain state (verified or pending).
        state: Option<DomainState>,
    },
    /// Update an organization's name and domain.
    Update {
        /// Organization id.
        id: OrganizationId,
        /// New display name.
        name: String,
        /// Domain to attach.
        domain: Option<String>,
        /// Domain state (verified or pending).
        state: Option<DomainState>,
    },
    /// Show an organization.
    Get {
        /// Organization id.
        id: OrganizationId,
    },
    /// Delete an organization.
    Delete {
        /// Organization id.
        id: OrganizationId,
    },
    /// List organizations.
    List {
        /// Only organizations with this domain; repeatable.
        #[arg(long = "domain")]
        domains: Vec<String>,
        #[command(flatten)]
        list: ListArgs,
    },
}

/// OAuth credential commands.
#[derive(Debug, Subcommand)]
pub enum OAuthCredentialCommand {
    /// List OAuth credentials.
    List,
    /// Create an OAuth credential.
    Create {
        /// Provider, e.g. GoogleOAuth. Asked for when omitted.
        connection_type: Option<OAuthConnectionType>,
    },
}

/// FGA commands.
#[derive(Debug, Subcommand)]
pub enum FgaCommand {
    /// List and apply resource types.
    #[command(subcommand, name = "resource-type")]
    ResourceType(ResourceTypeCommand),
    /// Create, update, list and delete resources.
    #[command(subcommand)]
    Resource(ResourceCommand),
    /// Assign, remove, check and query relations.
    #[command(subcommand)]
    Relation(RelationCommand),
    /// Convert and apply schemas.
    #[command(subcommand)]
    Schema(SchemaCommand),
}

/// Resource type commands.
#[derive(Debug, Subcommand)]
pub enum ResourceTypeCommand {
    /// List resource types.
    List(ListArgs),
    /// Replace all resource types with those in a JSON file (or stdin).
    Apply {
        /// File containing a JSON array of resource types.
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Resource commands.
#[derive(Debug, Subcommand)]
pub enum ResourceCommand {
    /// Create a resource, e.g. `create user:john '{"email":"john@example.com"}'`.
    Create {
        /// Resource, as type:id.
        resource: String,
        /// Metadata JSON object.
        meta: Option<String>,
    },
    /// Replace a resource's metadata.
    Update {
        /// Resource, as type:id.
        resource: String,
        /// Metadata JSON object.
        meta: String,
    },
    /// List resources.
    List {
        /// Only resources of this type.
        #[arg(long = "type")]
        resource_type: Option<String>,
        /// Search term.
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Delete a resource and its relation assignments.
    Delete {
        /// Resource, as type:id.
        resource: String,
    },
}

/// Relation commands.
#[derive(Debug, Subcommand)]
pub enum RelationCommand {
    /// Assign a relation, e.g. `assign user:john owner document:xyz`.
    Assign {
        /// Subject, as type:id or type:id#relation.
        subject: String,
        /// Relation name.
        relation: String,
        /// Resource, as type:id.
        resource: String,
        /// Policy deciding when the relation applies.
        #[arg(short, long)]
        policy: Option<String>,
    },
    /// Remove a relation assignment.
    Remove {
        /// Subject, as type:id or type:id#relation.
        subject: String,
        /// Relation name.
        relation: String,
        /// Resource, as type:id.
        resource: String,
    },
    /// Check whether a subject holds a relation.
    Check(CheckArgs),
    /// Query relations, e.g. `query 'select document where user:john is owner'`.
    Query {
        /// Query text.
        query: String,
        /// Policy context JSON object.
        context: Option<String>,
        /// Warrant token for read-your-writes consistency.
        #[arg(short, long)]
        warrant_token: Option<String>,
        #[command(flatten)]
        list: ListArgs,
    },
}

/// Arguments of `fga relation check`.
#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Subject, as type:id or type:id#relation.
    pub subject: String,
    /// Relation name.
    pub relation: String,
    /// Resource, as type:id.
    pub resource: String,
    /// Policy context JSON object.
    pub context: Option<String>,
    /// Warrant token for read-your-writes consistency.
    #[arg(short, long)]
    pub warrant_token: Option<String>,
    /// Expected result; exit with status 1 when it differs.
    #[arg(long, value_name = "BOOL")]
    pub assert: Option<String>,
    /// Show how the decision was reached.
    #[arg(short, long)]
    pub debug: bool,
}

/// Schema commands.
#[derive(Debug, Subcommand)]
pub enum SchemaCommand {
    /// Convert schema text to resource types, or resource types to schema text.
    Convert {
        /// Input file.
        file: PathBuf,
        /// What to convert to.
        #[arg(long, value_enum, default_value_t = ConvertTo::Json)]
        to: ConvertTo,
        /// Output style.
        #[arg(long, value_enum, default_value_t = OutputStyle::Pretty)]
        output: OutputStyle,
    },
    /// Convert a schema and apply the resulting resource types.
    Apply {
        /// Schema file.
        file: PathBuf,
        /// Print the resource types being applied.
        #[arg(short, long)]
        verbose: bool,
        /// Fail when conversion produces warnings.
        #[arg(long)]
        strict: bool,
    },
}

/// Target of a schema conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConvertTo {
    /// Resource types as JSON.
    Json,
    /// Schema text.
    Schema,
}

/// How conversion results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputStyle {
    /// Labelled sections for reading.
    Pretty,
    /// The converted document only, for piping to a file.
    Raw,
}
