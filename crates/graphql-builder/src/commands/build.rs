use crate::output_utils;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use anyhow::Context;
use libgraphql_builder::FragmentRegistry;
use libgraphql_builder::OperationDef;
use libgraphql_builder::OperationInput;
use std::collections::HashSet;
use std::path::PathBuf;
use walkdir::WalkDir;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum OperationKindArg {
    Mutation,
    Query,
    Subscription,
}

#[derive(Debug, clap::Args)]
pub(crate) struct BuildCmd {
    #[arg(
        default_values_t=[
            "graphql".to_string(),
            "gql".to_string(),
        ],
        help="Set of file extensions to filter to when searching for fragment \
             files within a directory.",
        long,
        value_delimiter = ',',
    )]
    fragment_exts: Vec<String>,

    #[arg(
        help="Paths to fragment files or directories containing fragment \
             files. Each file holds a single `fragment <Name> on <Type> { ... }` \
             definition.",
        long="fragments",
        short='f',
    )]
    fragment_paths: Vec<PathBuf>,

    #[arg(
        help="Emit the document as a JSON string.",
        long,
    )]
    json: bool,

    #[arg(
        default_value_t=OperationKindArg::Query,
        help="The kind of operation to build when a header is generated.",
        long,
        value_enum,
    )]
    kind: OperationKindArg,

    #[arg(
        help="Name of the operation. When a name or variables are given, the \
             operation file holds only the operation body.",
        long,
    )]
    name: Option<String>,

    #[arg(
        help="Operation file containing either a complete operation or (with \
             --name/--var) just its body.",
        name="OPERATION_FILE",
        required=true,
    )]
    operation_file: PathBuf,

    #[arg(
        help="Variable declaration in `name=Type` form (e.g. `id=ID!`). May be \
             repeated; variables are declared in the order given.",
        long="var",
        value_parser=parse_variable,
    )]
    variables: Vec<(String, String)>,
}

impl BuildCmd {
    fn build_document(&self) -> anyhow::Result<String> {
        let fragment_files = self.find_fragment_files()?;
        log::debug!("Found {} fragment files to load.", fragment_files.len());

        let mut registry = FragmentRegistry::new();
        for path in &fragment_files {
            let fragment = registry.fragment_from_file(path)
                .with_context(|| format!("Failed to load fragment from {path:#?}"))?;
            log::trace!("Loaded fragment `{}` from {path:#?}.", fragment.name());
        }

        let content = std::fs::read_to_string(&self.operation_file)
            .with_context(|| format!(
                "Failed to read operation file {:#?}",
                self.operation_file,
            ))?;
        let body = content.trim_end().to_string();

        let input =
            if self.name.is_none() && self.variables.is_empty() {
                OperationInput::Raw(body)
            } else {
                let mut def = OperationDef::new(body)
                    .set_variables(self.variables.iter().cloned());
                if let Some(name) = &self.name {
                    def = def.set_name(name);
                }
                OperationInput::Structured(def)
            };

        let operation = match self.kind {
            OperationKindArg::Mutation => registry.mutation(input),
            OperationKindArg::Query => registry.query(input),
            OperationKindArg::Subscription => registry.subscription(input),
        }.with_context(|| format!(
            "Failed to build operation from {:#?}",
            self.operation_file,
        ))?;

        if self.json {
            Ok(serde_json::to_string(&operation)?)
        } else {
            Ok(operation.to_string())
        }
    }

    /// Finds all fragment files located at or under each path passed via
    /// `--fragments`, sorted so that registration order is stable.
    fn find_fragment_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        let fragment_exts = normalize_exts(&self.fragment_exts);

        let mut file_paths = vec![];
        for path in &self.fragment_paths {
            // A file named explicitly is always loaded, whatever its
            // extension.
            if path.is_file() {
                file_paths.push(path.to_owned());
                continue;
            }

            for entry in WalkDir::new(path.as_path()).follow_links(true) {
                let entry = entry.with_context(|| format!(
                    "Failed to scan fragment files at/under {path:#?}",
                ))?;
                let entry_path = entry.path();
                if !entry.file_type().is_file() {
                    log::trace!("Skipping non-file: {entry_path:#?}.");
                    continue;
                }

                let ext = entry_path.extension().map(|ext| ext.to_string_lossy());
                if ext.is_some_and(|ext| fragment_exts.contains(&*ext)) {
                    file_paths.push(entry_path.to_path_buf());
                } else {
                    log::trace!("Skipping non-fragment file: {entry_path:#?}.");
                }
            }
        }

        file_paths.sort();
        file_paths.dedup();
        Ok(file_paths)
    }
}

#[inherent::inherent]
impl RunnableCommand for BuildCmd {
    pub async fn run(self, _cli: Cli) -> CommandResult {
        match self.build_document() {
            Ok(document) => CommandResult::stdout(format_args!("{document}")),
            Err(e) => CommandResult::stderr(format_args!(
                "{} {e:#}",
                output_utils::RED_X,
            )),
        }
    }
}

/// Normalizes `--fragment-exts` values so that `.graphql` and `graphql` are
/// treated the same.
fn normalize_exts(exts: &[String]) -> HashSet<String> {
    exts.iter()
        .map(|ext| ext.trim_start_matches('.').to_string())
        .collect()
}

fn parse_variable(arg: &str) -> Result<(String, String), String> {
    let (name, type_annotation) = arg.split_once('=').ok_or_else(|| {
        format!("Expected a variable in `name=Type` form, but got `{arg}`.")
    })?;

    let name = name.trim().trim_start_matches('$');
    let type_annotation = type_annotation.trim();
    if name.is_empty() || type_annotation.is_empty() {
        return Err(format!(
            "Both a variable name and a type are required, but got `{arg}`.",
        ));
    }

    Ok((name.to_string(), type_annotation.to_string()))
}

#[cfg(test)]
mod tests {
    use super::normalize_exts;
    use super::parse_variable;
    use super::BuildCmd;
    use clap::Parser;
    use std::path::Path;
    use std::path::PathBuf;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        cmd: BuildCmd,
    }

    fn parse_build_cmd(args: &[&str]) -> BuildCmd {
        let argv = std::iter::once("build").chain(args.iter().copied());
        TestCli::try_parse_from(argv).unwrap().cmd
    }

    /// Lays out a fragment directory tree plus two operation files under a
    /// fresh temp dir:
    ///
    /// ```text
    /// fragments/post.graphql          fragment PostFields ... ...AuthorFields
    /// fragments/nested/author.gql     fragment AuthorFields ...
    /// fragments/notes.txt             (not a fragment)
    /// op.graphql                      raw operation
    /// body.graphql                    operation body only
    /// ```
    fn setup_workspace(test_name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "graphql-builder-cli-{test_name}-{}",
            std::process::id(),
        ));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(root.join("fragments/nested")).unwrap();

        write(
            &root.join("fragments/post.graphql"),
            "fragment PostFields on Post { title author { ...AuthorFields } }\n",
        );
        write(
            &root.join("fragments/nested/author.gql"),
            "fragment AuthorFields on User { id name }\n",
        );
        write(&root.join("fragments/notes.txt"), "these are not fragments\n");
        write(&root.join("op.graphql"), "{ post { ...PostFields } }\n");
        write(&root.join("body.graphql"), "{ post(id: $id) { ...PostFields } }\n");
        root
    }

    fn write(path: &Path, content: &str) {
        std::fs::write(path, content).unwrap();
    }

    fn path_arg(path: &Path) -> &str {
        path.to_str().unwrap()
    }

    const FRAGMENT_BLOCK: &str = "fragment PostFields on Post { title author { ...AuthorFields } }\n\
        fragment AuthorFields on User { id name }";

    #[test]
    fn fragment_files_are_found_recursively_and_filtered_by_extension() {
        let root = setup_workspace("find");
        let fragments_dir = root.join("fragments");
        let cmd = parse_build_cmd(&[
            "--fragments", path_arg(&fragments_dir),
            path_arg(&root.join("op.graphql")),
        ]);

        assert_eq!(
            cmd.find_fragment_files().unwrap(),
            vec![
                fragments_dir.join("nested/author.gql"),
                fragments_dir.join("post.graphql"),
            ],
        );
    }

    #[test]
    fn fragment_files_are_sorted_and_deduplicated() {
        let root = setup_workspace("dedup");
        let fragments_dir = root.join("fragments");
        let post = fragments_dir.join("post.graphql");
        let cmd = parse_build_cmd(&[
            "-f", path_arg(&post),
            "-f", path_arg(&fragments_dir),
            "--fragment-exts", "graphql",
            path_arg(&root.join("op.graphql")),
        ]);

        assert_eq!(cmd.find_fragment_files().unwrap(), vec![post]);
    }

    #[test]
    fn explicitly_named_file_is_loaded_regardless_of_extension() {
        let root = setup_workspace("explicit");
        let notes = root.join("fragments/notes.txt");
        let cmd = parse_build_cmd(&[
            "-f", path_arg(&notes),
            path_arg(&root.join("op.graphql")),
        ]);

        assert_eq!(cmd.find_fragment_files().unwrap(), vec![notes]);
        // notes.txt has no fragment header, so loading it fails.
        assert!(cmd.build_document().is_err());
    }

    #[test]
    fn raw_operation_document() {
        let root = setup_workspace("raw");
        let cmd = parse_build_cmd(&[
            "--fragments", path_arg(&root.join("fragments")),
            path_arg(&root.join("op.graphql")),
        ]);

        assert_eq!(
            cmd.build_document().unwrap(),
            format!("{{ post {{ ...PostFields }} }}\n{FRAGMENT_BLOCK}"),
        );
    }

    #[test]
    fn structured_operation_from_name_and_vars() {
        let root = setup_workspace("structured");
        let cmd = parse_build_cmd(&[
            "--fragments", path_arg(&root.join("fragments")),
            "--name", "GetPost",
            "--var", "id=ID!",
            path_arg(&root.join("body.graphql")),
        ]);

        assert_eq!(
            cmd.build_document().unwrap(),
            format!(
                "query GetPost ($id: ID!) {{ post(id: $id) {{ ...PostFields }} }}\n\
                {FRAGMENT_BLOCK}",
            ),
        );
    }

    #[test]
    fn vars_without_name_use_kind_keyword() {
        let root = setup_workspace("kind");
        let cmd = parse_build_cmd(&[
            "--fragments", path_arg(&root.join("fragments")),
            "--kind", "mutation",
            "--var", "id=ID!",
            path_arg(&root.join("body.graphql")),
        ]);

        let document = cmd.build_document().unwrap();
        assert!(document.starts_with("mutation ($id: ID!) { post(id: $id)"));
    }

    #[test]
    fn json_output_is_a_json_string_of_the_document() {
        let root = setup_workspace("json");
        let cmd = parse_build_cmd(&[
            "--fragments", path_arg(&root.join("fragments")),
            "--json",
            path_arg(&root.join("op.graphql")),
        ]);

        let output = cmd.build_document().unwrap();
        let expected = format!("{{ post {{ ...PostFields }} }}\n{FRAGMENT_BLOCK}");
        assert_eq!(output, serde_json::to_string(&expected).unwrap());
        assert_eq!(serde_json::from_str::<String>(&output).unwrap(), expected);
    }

    #[test]
    fn missing_fragment_is_reported() {
        let root = setup_workspace("missing");
        let cmd = parse_build_cmd(&[path_arg(&root.join("op.graphql"))]);

        let err = cmd.build_document().unwrap_err();
        assert!(format!("{err:#}").contains("`PostFields`"));
    }

    #[test]
    fn parse_variable_splits_on_first_equals() {
        assert_eq!(
            parse_variable(r#"publication=String = "NYTimes""#),
            Ok(("publication".to_string(), r#"String = "NYTimes""#.to_string())),
        );
    }

    #[test]
    fn parse_variable_strips_dollar_sign() {
        assert_eq!(
            parse_variable("$id=ID!"),
            Ok(("id".to_string(), "ID!".to_string())),
        );
    }

    #[test]
    fn parse_variable_rejects_malformed_input() {
        assert!(parse_variable("id").is_err());
        assert!(parse_variable("=ID!").is_err());
        assert!(parse_variable("id=").is_err());
    }

    #[test]
    fn fragment_exts_are_normalized() {
        let exts = normalize_exts(&[".graphql".to_string(), "gql".to_string()]);
        assert!(exts.contains("graphql"));
        assert!(exts.contains("gql"));
        assert_eq!(exts.len(), 2);
    }
}
