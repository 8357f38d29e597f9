//! Assemble tokens into a [`Job`], or reject malformed input.

/// One stage of a pipeline.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Command {
    /// Program name (index 0) and its arguments. Non-empty for any
    /// `Command` that survives parsing.
    pub argv: Vec<String>,
    /// This stage reads its stdin from an upstream pipe.
    pub in_redirect: bool,
    /// This stage writes its stdout to a downstream pipe or a file.
    pub out_redirect: bool,
    /// This stage is the `>` file target: `argv[0]` is a filename, not a
    /// program.
    pub is_last_of_pipeline: bool,
}

/// An ordered pipeline plus its background marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub cmds: Vec<Command>,
    pub in_bg: bool,
}

/// Parse a tokenized input line into a [`Job`].
///
/// Returns `Ok(None)` for a no-op line (empty, or just a lone `&`) — the
/// REPL should simply redisplay the prompt. Returns `Err(message)` for
/// malformed input, to be printed verbatim.
pub fn parse_job(tokens: Vec<String>) -> Result<Option<Job>, String> {
    let mut tokens = tokens;

    let in_bg = if tokens.last().map(String::as_str) == Some("&") {
        tokens.pop();
        true
    } else {
        false
    };

    if tokens.is_empty() {
        return Ok(None);
    }

    let tokens: Vec<String> = tokens.iter().map(|tok| strip_quote_fixup(tok)).collect();

    validate(&tokens)?;

    Ok(Some(assemble(tokens, in_bg)))
}

/// Corner-case cleanup for tokens that arrive pre-quoted from some other
/// tokenizer — harmless here since [`crate::tokenizer`] never produces
/// such tokens itself.
fn strip_quote_fixup(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() > 1 && (chars[0] == '\'' || chars[0] == '"') {
        chars[1..chars.len() - 1].iter().collect()
    } else {
        token.to_string()
    }
}

fn is_alnum_leading(token: &str) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c.is_ascii_digit() || c == '.' || c == '/')
}

fn is_modifier(token: &str) -> bool {
    token == "|" || token == ">"
}

fn validate(tokens: &[String]) -> Result<(), String> {
    let mut expect_modifier = false;

    for (i, token) in tokens.iter().enumerate() {
        if expect_modifier {
            if !is_modifier(token) {
                return Err(format!("illegal: {token}"));
            }
            expect_modifier = false;
        } else {
            if !is_alnum_leading(token) {
                return Err(format!("illegal: {token}"));
            }
            if let Some(next) = tokens.get(i + 1) {
                if !is_alnum_leading(next) {
                    expect_modifier = true;
                }
            }
        }
    }

    // A trailing `|` or `>` has no command on its right-hand side — the
    // expect_modifier scan above only rejects a *non-modifier* token where a
    // modifier was expected, so a modifier as the very last token slips
    // through unless checked separately here.
    if let Some(last) = tokens.last() {
        if is_modifier(last) {
            return Err(format!("illegal: {last}"));
        }
    }

    // `>` names a single file target — the scans above never limit how
    // many barewords can follow it, since a run of alnum-leading tokens
    // looks exactly like ordinary arguments to them.
    if let Some(pos) = tokens.iter().position(|t| t == ">") {
        if pos + 2 != tokens.len() {
            return Err(format!("illegal: {}", tokens[pos + 2]));
        }
    }

    Ok(())
}

fn assemble(tokens: Vec<String>, in_bg: bool) -> Job {
    let mut cmds = vec![Command::default()];

    for token in tokens {
        match token.as_str() {
            "|" => {
                cmds.last_mut().unwrap().out_redirect = true;
                cmds.push(Command {
                    in_redirect: true,
                    ..Default::default()
                });
            }
            ">" => {
                cmds.last_mut().unwrap().out_redirect = true;
                cmds.push(Command {
                    in_redirect: true,
                    is_last_of_pipeline: true,
                    ..Default::default()
                });
            }
            other => cmds.last_mut().unwrap().argv.push(other.to_string()),
        }
    }

    Job { cmds, in_bg }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn parse(line: &str) -> Result<Option<Job>, String> {
        parse_job(tokenize(line))
    }

    #[test]
    fn single_command() {
        let job = parse("pwd").unwrap().unwrap();
        assert!(!job.in_bg);
        assert_eq!(job.cmds.len(), 1);
        assert_eq!(job.cmds[0].argv, vec!["pwd"]);
        assert!(!job.cmds[0].in_redirect);
        assert!(!job.cmds[0].out_redirect);
    }

    #[test]
    fn background_marker_is_extracted() {
        let job = parse("sleep 10 &").unwrap().unwrap();
        assert!(job.in_bg);
        assert_eq!(job.cmds[0].argv, vec!["sleep", "10"]);
    }

    #[test]
    fn empty_line_is_a_no_op() {
        assert_eq!(parse("").unwrap(), None);
    }

    #[test]
    fn lone_ampersand_is_a_no_op() {
        assert_eq!(parse("&").unwrap(), None);
    }

    #[test]
    fn pipeline_stages_get_correct_flags() {
        let job = parse("echo hello | tr a-z A-Z").unwrap().unwrap();
        assert_eq!(job.cmds.len(), 2);
        assert!(!job.cmds[0].in_redirect);
        assert!(job.cmds[0].out_redirect);
        assert!(job.cmds[1].in_redirect);
        assert!(!job.cmds[1].out_redirect);
        assert!(!job.cmds[1].is_last_of_pipeline);
    }

    #[test]
    fn redirect_to_file_tail_has_single_arg() {
        let job = parse("echo one | cat | cat > out.txt").unwrap().unwrap();
        let tail = job.cmds.last().unwrap();
        assert!(tail.is_last_of_pipeline);
        assert!(tail.in_redirect);
        assert!(!tail.out_redirect);
        assert_eq!(tail.argv, vec!["out.txt"]);
    }

    #[test]
    fn leading_pipe_is_illegal() {
        assert_eq!(parse("| foo"), Err("illegal: |".to_string()));
    }

    #[test]
    fn adjacent_modifiers_are_illegal() {
        assert!(parse("echo hi | | cat").is_err());
        assert!(parse("echo hi | > cat").is_err());
    }

    #[test]
    fn modifier_embedded_in_token_is_illegal() {
        assert!(parse("echo |foo").is_err());
    }

    #[test]
    fn trailing_modifier_with_nothing_after_it_is_illegal() {
        assert_eq!(parse("echo hi |"), Err("illegal: |".to_string()));
        assert_eq!(parse("echo hi >"), Err("illegal: >".to_string()));
    }

    #[test]
    fn redirect_target_must_be_a_single_trailing_token() {
        assert_eq!(parse("echo hi > out.txt extra"), Err("illegal: extra".to_string()));
        assert_eq!(parse("echo hi > out.txt > out2.txt"), Err("illegal: >".to_string()));
        assert!(parse("echo hi | cat > out.txt").is_ok());
    }

    #[test]
    fn invariants_hold_for_every_parsed_job() {
        for line in [
            "echo hi",
            "echo hi | cat",
            "echo hi | cat | cat",
            "echo hi > out.txt",
            "echo hi | cat > out.txt",
        ] {
            let job = parse(line).unwrap().unwrap();
            assert!(!job.cmds[0].in_redirect);
            for i in 0..job.cmds.len() - 1 {
                assert_eq!(job.cmds[i].out_redirect, job.cmds[i + 1].in_redirect);
            }
            for (i, cmd) in job.cmds.iter().enumerate() {
                if cmd.is_last_of_pipeline {
                    assert_eq!(i, job.cmds.len() - 1);
                    assert_eq!(cmd.argv.len(), 1);
                }
            }
        }
    }
}
