//! Compilation Module
//!
//! The seam between the caches and whatever turns a pattern into an artifact.

use std::sync::Arc;

use regex::Regex;
use regex_syntax::ast::{self, parse::Parser, AssertionKind, Ast, ClassSetItem, GroupKind};

use crate::error::CompileError;
use crate::flag::Flag;

// == Compiler ==
/// Turns a pattern and flag into a cacheable artifact.
///
/// Caches call this only on a miss, while holding their write lock.
pub trait Compiler: Send + Sync {
    /// The compiled value handed out by the cache.
    type Artifact: Send + Sync;

    /// Compiles `pattern` under `flag`.
    ///
    /// Implementations may panic for [`Flag::Must`] and [`Flag::MustPosix`]
    /// instead of returning an error.
    fn compile(&self, pattern: &str, flag: Flag) -> Result<Self::Artifact, CompileError>;
}

impl<C: Compiler + ?Sized> Compiler for Arc<C> {
    type Artifact = C::Artifact;

    fn compile(&self, pattern: &str, flag: Flag) -> Result<Self::Artifact, CompileError> {
        (**self).compile(pattern, flag)
    }
}

// == Regex Compiler ==
/// [`Compiler`] backed by the `regex` crate.
///
/// With a POSIX flag the pattern is rejected unless it stays within POSIX ERE
/// syntax. Match semantics remain leftmost-first.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexCompiler;

impl Compiler for RegexCompiler {
    type Artifact = Regex;

    /// # Panics
    ///
    /// Panics on a malformed pattern when `flag` is `Must` or `MustPosix`.
    /// Only pass trusted patterns with those flags.
    fn compile(&self, pattern: &str, flag: Flag) -> Result<Regex, CompileError> {
        let result = compile_regex(pattern, flag.is_posix());
        if flag.is_must() {
            return match result {
                Ok(regex) => Ok(regex),
                Err(err) => panic!("regex: compile({:?}): {}", pattern, err),
            };
        }
        result
    }
}

fn compile_regex(pattern: &str, posix: bool) -> Result<Regex, CompileError> {
    let regex = Regex::new(pattern)?;
    if posix {
        check_posix(pattern)?;
    }
    Ok(regex)
}

// == POSIX Check ==
/// Rejects constructs outside POSIX ERE.
fn check_posix(pattern: &str) -> Result<(), CompileError> {
    let ast = Parser::new()
        .parse(pattern)
        .map_err(|err| CompileError::Invalid(err.to_string()))?;
    ast::visit(&ast, PosixSyntax)
}

struct PosixSyntax;

impl ast::Visitor for PosixSyntax {
    type Output = ();
    type Err = CompileError;

    fn finish(self) -> Result<(), CompileError> {
        Ok(())
    }

    fn visit_pre(&mut self, ast: &Ast) -> Result<(), CompileError> {
        let construct = match ast {
            Ast::Flags(_) => "inline flag group",
            Ast::ClassPerl(_) => "Perl character class",
            Ast::ClassUnicode(_) => "Unicode character class",
            Ast::Repetition(rep) if !rep.greedy => "non-greedy repetition",
            Ast::Group(group) => match &group.kind {
                GroupKind::CaptureIndex(_) => return Ok(()),
                _ => "non-capturing or named group",
            },
            Ast::Assertion(assertion) => match assertion.kind {
                AssertionKind::StartLine | AssertionKind::EndLine => return Ok(()),
                _ => "assertion other than ^ and $",
            },
            _ => return Ok(()),
        };
        Err(CompileError::NotPosix { construct })
    }

    fn visit_class_set_item_pre(&mut self, item: &ClassSetItem) -> Result<(), CompileError> {
        let construct = match item {
            ClassSetItem::Perl(_) => "Perl character class",
            ClassSetItem::Unicode(_) => "Unicode character class",
            _ => return Ok(()),
        };
        Err(CompileError::NotPosix { construct })
    }
}
