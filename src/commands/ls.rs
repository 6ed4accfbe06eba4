use crate::commands::{CommandError, CommandTrait};
use crate::ext::expand_env_vars;
use crate::filesystem::{Children, Node, ResolveError, resolve_node};
use crate::session::Session;

const PERMISSIONS: &str = "rw-r--r--";
const LINKS: u32 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LsOptions {
    /// `-s`: expand `$NAME` in targets before resolving them
    expand: bool,
    /// `-l`: one line per entry with type, owner and size
    long: bool,
}

/// Lists directory contents
#[derive(Debug, Clone)]
pub struct Ls {
    args: Vec<String>,
}

impl Ls {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    fn parse_args(&self) -> Result<(LsOptions, Vec<&str>), CommandError> {
        let mut options = LsOptions::default();
        let mut targets = Vec::new();

        for arg in &self.args {
            match arg.strip_prefix('-') {
                Some(flags) if !flags.is_empty() => {
                    for flag in flags.chars() {
                        match flag {
                            's' => options.expand = true,
                            'l' => options.long = true,
                            option => return Err(CommandError::InvalidOption { option }),
                        }
                    }
                }
                _ => targets.push(arg.as_str()),
            }
        }

        Ok((options, targets))
    }
}

/// `drw-r--r--`: the type character sits directly against the permissions, as in `ls -l`
fn long_line(name: &str, node: &Node) -> String {
    format!(
        "{}{} {} {} {} {}",
        node.kind(),
        PERMISSIONS,
        LINKS,
        node.owner(),
        node.size(),
        name
    )
}

fn list_children(children: &Children, options: LsOptions) -> String {
    if options.long {
        children
            .iter()
            .map(|(name, node)| long_line(name, node))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        children.keys().cloned().collect::<Vec<_>>().join(" ")
    }
}

fn list_target(session: &Session, target: &str, options: LsOptions) -> String {
    let target = if options.expand {
        expand_env_vars(target, session.environment())
    } else {
        target.to_string()
    };

    match resolve_node(session.tree(), session.current_dir(), &target) {
        Ok((_, Node::Directory { children, .. })) => {
            let listing = list_children(children, options);
            if listing.is_empty() {
                format!("{target}:")
            } else {
                format!("{target}:\n{listing}")
            }
        }
        Ok((_, node)) if options.long => long_line(&target, node),
        Ok(_) => target,
        Err(source) => CommandError::PathError {
            command: "ls",
            path: target,
            source,
        }
        .to_string(),
    }
}

impl CommandTrait for Ls {
    fn name(&self) -> &'static str {
        "ls"
    }

    fn run(&self, session: &mut Session) -> Result<String, CommandError> {
        let (options, targets) = self.parse_args()?;

        if targets.is_empty() {
            let children = session
                .tree()
                .children(session.current_dir())
                .ok_or_else(|| CommandError::PathError {
                    command: self.name(),
                    path: ".".to_string(),
                    source: ResolveError::NotFound {
                        segment: ".".to_string(),
                    },
                })?;
            return Ok(list_children(children, options));
        }

        Ok(targets
            .into_iter()
            .map(|target| list_target(session, target, options))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    use crate::session::tests::loaded_session;

    #[rstest]
    #[case(&["-l"], LsOptions { expand: false, long: true }, &[])]
    #[case(&["-s", "$HOME"], LsOptions { expand: true, long: false }, &["$HOME"])]
    #[case(&["-ls", "a", "b"], LsOptions { expand: true, long: true }, &["a", "b"])]
    #[case(&["a", "-l"], LsOptions { expand: false, long: true }, &["a"])]
    #[case(&["-"], LsOptions::default(), &["-"])]
    fn parses_flags_and_targets(
        #[case] args: &[&str],
        #[case] options: LsOptions,
        #[case] targets: &[&str],
    ) {
        let ls = Ls::new(args.iter().map(|arg| arg.to_string()).collect());
        let (parsed_options, parsed_targets) = ls.parse_args().unwrap();
        assert_eq!(parsed_options, options);
        assert_eq!(parsed_targets, targets);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let mut session = loaded_session();
        assert_eq!(session.execute("ls -la"), "ls: invalid option -- 'a'");
    }

    #[test]
    fn lists_current_directory_names() {
        let mut session = loaded_session();
        assert_eq!(session.execute("ls"), "a top.txt");
        session.execute("cd a");
        assert_eq!(session.execute("ls"), "b d");
    }

    #[test]
    fn repeated_listing_is_stable() {
        let mut session = loaded_session();
        let first = session.execute("ls -l");
        assert_eq!(session.execute("ls -l"), first);
        assert_eq!(session.execute("ls"), session.execute("ls"));
    }

    #[test]
    fn long_format_joins_kind_to_permissions() {
        let mut session = loaded_session();
        assert_eq!(
            session.execute("ls -l"),
            "drw-r--r-- 1 root 0 a\n-rw-r--r-- 1 alice 3 top.txt"
        );
    }

    #[test]
    fn empty_directory_lists_nothing() {
        let mut session = loaded_session();
        session.execute("cd a/d");
        assert_eq!(session.execute("ls"), "");
        assert_eq!(session.execute("ls -l"), "");
    }

    #[test]
    fn directory_target_prints_header_and_listing() {
        let mut session = loaded_session();
        assert_eq!(session.execute("ls a"), "a:\nb d");
        assert_eq!(session.execute("ls a/d"), "a/d:");
    }

    #[test]
    fn file_target_prints_its_name() {
        let mut session = loaded_session();
        assert_eq!(session.execute("ls top.txt"), "top.txt");
        assert_eq!(
            session.execute("ls -l /a/b/c.txt"),
            "-rw-r--r-- 1 root 5 /a/b/c.txt"
        );
    }

    #[test]
    fn file_target_with_trailing_slash_is_not_a_directory() {
        let mut session = loaded_session();
        assert_eq!(session.execute("ls top.txt/"), "ls: top.txt/: not a directory");
        assert_eq!(
            session.execute("ls -l /a/b/c.txt/"),
            "ls: /a/b/c.txt/: not a directory"
        );
        assert_eq!(session.execute("ls a/"), "a/:\nb d");
    }

    #[test]
    fn missing_target_is_reported_and_others_still_listed() {
        let mut session = loaded_session();
        assert_eq!(
            session.execute("ls top.txt nope a/d"),
            "top.txt\nls: nope: no such file or directory\na/d:"
        );
    }

    #[test]
    fn relative_targets_resolve_from_current_directory() {
        let mut session = loaded_session();
        session.execute("cd a");
        assert_eq!(session.execute("ls b/c.txt ../top.txt"), "b/c.txt\n../top.txt");
    }

    #[test]
    fn expand_flag_substitutes_environment_variables() {
        let mut session = loaded_session();
        assert_eq!(session.execute("ls -s $DIR"), "a:\nb d");
        assert_eq!(
            session.execute("ls $DIR"),
            "ls: $DIR: no such file or directory"
        );
        assert_eq!(
            session.execute("ls -s $MISSING"),
            "ls: $MISSING: no such file or directory"
        );
    }
}
