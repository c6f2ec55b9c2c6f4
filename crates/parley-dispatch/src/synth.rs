//! Placeholder synthesis for fakeable arguments.
//!
//! IRC does not always supply an entity where a category declares one.
//! A kick issued by the server has no kicking user, only a server name;
//! a mode change from services may come from a nick the client has
//! never seen. Subscribers would rather receive a placeholder than an
//! absent slot, so the dispatcher fills fakeable slots before delivery.
//!
//! # Recipes
//!
//! A [`RecipeBook`] lists, per [`ParamKind`], the ordered input kinds
//! from which a value of that kind can be built:
//!
//! ```text
//! Client         ← [Host]
//! Client         ← [ChannelClient]
//! ChannelClient  ← [Client, Channel]
//! Channel        ← [Target]
//! ```
//!
//! # Resolution
//!
//! For every absent fakeable slot, depth first:
//!
//! 1. The pool is every present, source-tagged argument of the call.
//! 2. Each recipe for the wanted kind is tried in order.
//! 3. Each input is taken from the pool by declared kind, or resolved
//!    recursively. A kind already on the resolution stack counts as
//!    unresolved, and so does anything deeper than the depth limit.
//! 4. The first recipe whose inputs all resolve and whose builder
//!    returns a value of the wanted kind wins. The value is marked
//!    synthetic.
//!
//! An unresolvable slot stays [`EventArg::Absent`]. That is not an error.
//! A builder that panics is caught and counts as declined.

use crate::error::{panic_message, SynthesisError};
use parley_event::{CategoryDescriptor, EventArg, ParamKind};
use parley_types::{ChannelClientInfo, ChannelInfo, ClientInfo, Parser};
use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::trace;

/// Default bound on nested recipe resolution.
pub const DEFAULT_MAX_DEPTH: usize = 4;

type BuildFn = dyn Fn(&dyn Parser, &[EventArg]) -> Option<EventArg> + Send + Sync;

/// One way to build a value of some kind.
#[derive(Clone)]
pub struct Recipe {
    name: String,
    inputs: Vec<ParamKind>,
    build: Arc<BuildFn>,
}

impl Recipe {
    /// Creates a recipe.
    ///
    /// `build` receives one resolved argument per input kind, in order,
    /// and may still decline by returning `None`.
    pub fn new<F>(name: impl Into<String>, inputs: Vec<ParamKind>, build: F) -> Self
    where
        F: Fn(&dyn Parser, &[EventArg]) -> Option<EventArg> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            inputs,
            build: Arc::new(build),
        }
    }

    /// Label used in trace output.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input kinds, in the order `build` receives them.
    #[must_use]
    pub fn inputs(&self) -> &[ParamKind] {
        &self.inputs
    }
}

impl fmt::Debug for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recipe")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .finish_non_exhaustive()
    }
}

/// Recipes keyed by the kind they produce.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: HashMap<ParamKind, Vec<Recipe>>,
}

impl RecipeBook {
    /// A book with no recipes.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The recipes for IRC entities.
    #[must_use]
    pub fn standard() -> Self {
        let mut book = Self::empty();

        book.add(
            ParamKind::Client,
            Recipe::new("client-from-host", vec![ParamKind::Host], |_, args| {
                let source = args.first()?.as_text()?;
                if ClientInfo::parse_host(source).is_empty() {
                    return None;
                }
                Some(ClientInfo::from_host(source).into())
            }),
        );
        book.add(
            ParamKind::Client,
            Recipe::new(
                "client-from-member",
                vec![ParamKind::ChannelClient],
                |_, args| {
                    let member = args.first()?.as_channel_client()?;
                    Some(EventArg::Client(Arc::clone(member.client())))
                },
            ),
        );
        book.add(
            ParamKind::ChannelClient,
            Recipe::new(
                "member-from-client",
                vec![ParamKind::Client, ParamKind::Channel],
                |_, args| {
                    let client = args.first()?.as_client()?;
                    let channel = args.get(1)?.as_channel()?;
                    Some(ChannelClientInfo::new(Arc::clone(client), channel.name()).into())
                },
            ),
        );
        book.add(
            ParamKind::Channel,
            Recipe::new("channel-from-target", vec![ParamKind::Target], |_, args| {
                let name = args.first()?.as_text()?;
                ChannelInfo::try_new(name).ok().map(EventArg::from)
            }),
        );

        book
    }

    /// Appends a recipe for `kind`, after any already present.
    pub fn add(&mut self, kind: ParamKind, recipe: Recipe) -> &mut Self {
        self.recipes.entry(kind).or_default().push(recipe);
        self
    }

    /// Recipes for `kind`, in trial order.
    #[must_use]
    pub fn recipes_for(&self, kind: ParamKind) -> &[Recipe] {
        self.recipes.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of recipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.values().map(Vec::len).sum()
    }

    /// Returns `true` if the book has no recipes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fills absent fakeable arguments from a [`RecipeBook`].
#[derive(Debug, Clone)]
pub struct FakeSynthesizer {
    book: RecipeBook,
    max_depth: usize,
    catch_panics: bool,
}

impl Default for FakeSynthesizer {
    fn default() -> Self {
        Self::new(RecipeBook::standard())
    }
}

impl FakeSynthesizer {
    /// Creates a synthesizer with [`DEFAULT_MAX_DEPTH`].
    #[must_use]
    pub fn new(book: RecipeBook) -> Self {
        Self {
            book,
            max_depth: DEFAULT_MAX_DEPTH,
            catch_panics: true,
        }
    }

    /// Sets the recursion bound. Zero disables synthesis.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Whether a panicking recipe builder is caught. On by default.
    ///
    /// When disabled, a panic unwinds into the caller of `fill`.
    #[must_use]
    pub fn with_catch_panics(mut self, enabled: bool) -> Self {
        self.catch_panics = enabled;
        self
    }

    /// The recursion bound.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The recipes in use.
    #[must_use]
    pub fn book(&self) -> &RecipeBook {
        &self.book
    }

    /// Fills absent fakeable slots of `args` in place.
    ///
    /// Present arguments are never touched. Returns the number of slots
    /// filled. Caught recipe panics are discarded; see
    /// [`FakeSynthesizer::fill_reporting`].
    pub fn fill(
        &self,
        category: &CategoryDescriptor,
        parser: &dyn Parser,
        args: &mut [EventArg],
    ) -> usize {
        self.fill_reporting(category, parser, args, &mut |_| {})
    }

    /// Like [`FakeSynthesizer::fill`], handing every caught recipe panic
    /// to `on_failure`.
    pub fn fill_reporting(
        &self,
        category: &CategoryDescriptor,
        parser: &dyn Parser,
        args: &mut [EventArg],
        on_failure: &mut dyn FnMut(SynthesisError),
    ) -> usize {
        let pool: Vec<(ParamKind, &EventArg)> = category
            .params()
            .iter()
            .zip(args.iter())
            .filter(|(param, arg)| param.is_source() && !arg.is_absent())
            .map(|(param, arg)| (param.kind, arg))
            .collect();

        let mut filled = Vec::new();
        for (index, param) in category.params().iter().enumerate() {
            if !param.is_fakeable() || !args.get(index).is_some_and(EventArg::is_absent) {
                continue;
            }
            let mut visiting = Vec::new();
            match self.resolve(param.kind, parser, &pool, &mut visiting, on_failure, 1) {
                Some(value) => {
                    trace!(
                        category = %category.name(),
                        param = %param.name,
                        "synthesized placeholder"
                    );
                    filled.push((index, value));
                }
                None => {
                    trace!(
                        category = %category.name(),
                        param = %param.name,
                        "no recipe resolved"
                    );
                }
            }
        }

        let count = filled.len();
        for (index, value) in filled {
            args[index] = value;
        }
        count
    }

    /// Resolves one value of `kind`, or `None`.
    fn resolve(
        &self,
        kind: ParamKind,
        parser: &dyn Parser,
        pool: &[(ParamKind, &EventArg)],
        visiting: &mut Vec<ParamKind>,
        on_failure: &mut dyn FnMut(SynthesisError),
        depth: usize,
    ) -> Option<EventArg> {
        if depth > self.max_depth {
            trace!(%kind, depth, "synthesis depth exceeded");
            return None;
        }
        if visiting.contains(&kind) {
            trace!(%kind, "synthesis cycle");
            return None;
        }

        visiting.push(kind);
        let result = self
            .book
            .recipes_for(kind)
            .iter()
            .find_map(|recipe| {
                let value = self.try_recipe(recipe, parser, pool, visiting, on_failure, depth)?;
                if value.is_absent() || !value.fits(kind) {
                    trace!(
                        recipe = %recipe.name,
                        %kind,
                        produced = value.variant_name(),
                        "recipe output does not fit, ignoring"
                    );
                    return None;
                }
                Some(value)
            });
        visiting.pop();

        result.map(EventArg::into_synthetic)
    }

    fn try_recipe(
        &self,
        recipe: &Recipe,
        parser: &dyn Parser,
        pool: &[(ParamKind, &EventArg)],
        visiting: &mut Vec<ParamKind>,
        on_failure: &mut dyn FnMut(SynthesisError),
        depth: usize,
    ) -> Option<EventArg> {
        let mut inputs = Vec::with_capacity(recipe.inputs.len());
        for &input in &recipe.inputs {
            let value = match pool.iter().find(|(kind, _)| *kind == input) {
                Some((_, arg)) => (*arg).clone(),
                None => self.resolve(input, parser, pool, visiting, on_failure, depth + 1)?,
            };
            inputs.push(value);
        }

        let built = if self.catch_panics {
            match catch_unwind(AssertUnwindSafe(|| (recipe.build)(parser, &inputs))) {
                Ok(built) => built,
                Err(payload) => {
                    let message = panic_message(&*payload);
                    trace!(recipe = %recipe.name, %message, "recipe panicked");
                    on_failure(SynthesisError::RecipePanicked {
                        recipe: recipe.name.clone(),
                        message,
                    });
                    None
                }
            }
        } else {
            (recipe.build)(parser, &inputs)
        };
        if built.is_some() {
            trace!(recipe = %recipe.name, "recipe resolved");
        }
        built
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_event::{EventKind, ParamKind};
    use parley_types::FixedParser;

    fn kick_args(host: EventArg) -> Vec<EventArg> {
        let victim = ChannelClientInfo::new(Arc::new(ClientInfo::new("victim")), "#test");
        vec![
            ChannelInfo::new("#test").into(),
            victim.into(),
            EventArg::Absent,
            "bye".into(),
            host,
        ]
    }

    // ── Recipe book ─────────────────────────────────────────

    #[test]
    fn standard_book_contents() {
        let book = RecipeBook::standard();
        assert_eq!(book.len(), 4);
        let names: Vec<_> = book
            .recipes_for(ParamKind::Client)
            .iter()
            .map(Recipe::name)
            .collect();
        assert_eq!(names, ["client-from-host", "client-from-member"]);
        assert!(book.recipes_for(ParamKind::Number).is_empty());
    }

    #[test]
    fn add_appends_in_order() {
        let mut book = RecipeBook::empty();
        assert!(book.is_empty());
        book.add(ParamKind::Text, Recipe::new("a", vec![], |_, _| None))
            .add(ParamKind::Text, Recipe::new("b", vec![], |_, _| None));
        let names: Vec<_> = book.recipes_for(ParamKind::Text).iter().map(Recipe::name).collect();
        assert_eq!(names, ["a", "b"]);
    }

    // ── Filling ─────────────────────────────────────────────

    #[test]
    fn kick_by_server_gets_synthetic_kicker() {
        let synth = FakeSynthesizer::default();
        let desc = EventKind::ChannelKick.descriptor();
        let mut args = kick_args("serverhost".into());

        let filled = synth.fill(&desc, &FixedParser::new(), &mut args);
        assert_eq!(filled, 1);

        let kicker = args[2].as_channel_client().unwrap();
        assert!(kicker.is_synthetic());
        assert_eq!(kicker.nickname(), "serverhost");
        assert_eq!(kicker.channel(), "#test");
        assert!(kicker.client().is_synthetic());
    }

    #[test]
    fn full_source_populates_ident_and_host() {
        let synth = FakeSynthesizer::default();
        let desc = EventKind::ChannelKick.descriptor();
        let mut args = kick_args("op!ops@example.org".into());

        synth.fill(&desc, &FixedParser::new(), &mut args);
        let kicker = args[2].as_channel_client().unwrap();
        assert_eq!(kicker.client().ident(), Some("ops"));
        assert_eq!(kicker.client().host(), Some("example.org"));
    }

    #[test]
    fn insufficient_sources_leave_slot_absent() {
        let synth = FakeSynthesizer::default();
        let desc = EventKind::ChannelKick.descriptor();
        let mut args = kick_args(EventArg::Absent);

        assert_eq!(synth.fill(&desc, &FixedParser::new(), &mut args), 0);
        assert!(args[2].is_absent());
    }

    #[test]
    fn present_arguments_are_never_overwritten() {
        let synth = FakeSynthesizer::default();
        let desc = EventKind::ChannelKick.descriptor();
        let real = ChannelClientInfo::new(Arc::new(ClientInfo::new("op")), "#test");
        let mut args = kick_args("serverhost".into());
        args[2] = real.clone().into();

        assert_eq!(synth.fill(&desc, &FixedParser::new(), &mut args), 0);
        let kicker = args[2].as_channel_client().unwrap();
        assert_eq!(**kicker, real);
        assert!(!kicker.is_synthetic());
    }

    #[test]
    fn private_message_client_from_host() {
        let synth = FakeSynthesizer::default();
        let desc = EventKind::PrivateMessage.descriptor();
        let mut args = vec![EventArg::Absent, "hi".into(), "alice!a@h".into()];

        assert_eq!(synth.fill(&desc, &FixedParser::new(), &mut args), 1);
        let client = args[0].as_client().unwrap();
        assert_eq!(client.nickname(), "alice");
        assert!(client.is_synthetic());
    }

    #[test]
    fn non_source_arguments_are_not_in_the_pool() {
        // `reason` is plain text; it must not stand in for a host.
        let synth = FakeSynthesizer::new(RecipeBook::standard());
        let desc = parley_event::CategoryDescriptor::builder("Custom")
            .fakeable("who", ParamKind::Client)
            .plain("reason", ParamKind::Host)
            .build()
            .unwrap();
        let mut args = vec![EventArg::Absent, "nick!u@h".into()];

        assert_eq!(synth.fill(&desc, &FixedParser::new(), &mut args), 0);
    }

    // ── Bounds ──────────────────────────────────────────────

    #[test]
    fn zero_depth_disables_synthesis() {
        let synth = FakeSynthesizer::default().with_max_depth(0);
        let desc = EventKind::PrivateMessage.descriptor();
        let mut args = vec![EventArg::Absent, "hi".into(), "alice".into()];

        assert_eq!(synth.fill(&desc, &FixedParser::new(), &mut args), 0);
    }

    #[test]
    fn depth_limit_cuts_nested_resolution() {
        // member needs client (depth 2) which needs host from the pool.
        let desc = EventKind::ChannelKick.descriptor();

        let shallow = FakeSynthesizer::default().with_max_depth(1);
        let mut args = kick_args("serverhost".into());
        assert_eq!(shallow.fill(&desc, &FixedParser::new(), &mut args), 0);

        let enough = FakeSynthesizer::default().with_max_depth(2);
        let mut args = kick_args("serverhost".into());
        assert_eq!(enough.fill(&desc, &FixedParser::new(), &mut args), 1);
    }

    #[test]
    fn cycles_terminate() {
        // Client ← ChannelClient ← Client with nothing in the pool.
        let synth = FakeSynthesizer::default().with_max_depth(64);
        let desc = parley_event::CategoryDescriptor::builder("Loop")
            .fakeable("who", ParamKind::Client)
            .build()
            .unwrap();
        let mut args = vec![EventArg::Absent];

        assert_eq!(synth.fill(&desc, &FixedParser::new(), &mut args), 0);
        assert!(args[0].is_absent());
    }

    #[test]
    fn builder_may_decline() {
        let mut book = RecipeBook::empty();
        book.add(
            ParamKind::Channel,
            Recipe::new("never", vec![ParamKind::Target], |_, _| None),
        );
        book.add(
            ParamKind::Channel,
            Recipe::new("fallback", vec![ParamKind::Target], |_, _| {
                Some(ChannelInfo::new("#fallback").into())
            }),
        );
        let synth = FakeSynthesizer::new(book);
        let desc = parley_event::CategoryDescriptor::builder("Custom")
            .fakeable("channel", ParamKind::Channel)
            .source("raw", ParamKind::Target)
            .build()
            .unwrap();
        let mut args = vec![EventArg::Absent, "whatever".into()];

        assert_eq!(synth.fill(&desc, &FixedParser::new(), &mut args), 1);
        assert_eq!(args[0].as_channel().unwrap().name(), "#fallback");
        assert!(args[0].is_synthetic());
    }

    fn host_desc() -> CategoryDescriptor {
        CategoryDescriptor::builder("Custom")
            .fakeable("who", ParamKind::Client)
            .source("host", ParamKind::Host)
            .build()
            .unwrap()
    }

    fn boom_then_host_book() -> RecipeBook {
        let mut book = RecipeBook::empty();
        book.add(
            ParamKind::Client,
            Recipe::new("boom", vec![ParamKind::Host], |_, _| panic!("recipe boom")),
        );
        book.add(
            ParamKind::Client,
            Recipe::new("from-host", vec![ParamKind::Host], |_, args| {
                Some(ClientInfo::from_host(args[0].as_text()?).into())
            }),
        );
        book
    }

    #[test]
    fn panicking_builder_counts_as_declined() {
        let synth = FakeSynthesizer::new(boom_then_host_book());
        let mut args = vec![EventArg::Absent, "a!b@c".into()];
        let mut failures = Vec::new();

        let filled = synth.fill_reporting(&host_desc(), &FixedParser::new(), &mut args, &mut |e| {
            failures.push(e)
        });

        assert_eq!(filled, 1);
        assert_eq!(args[0].as_client().unwrap().nickname(), "a");
        assert_eq!(
            failures,
            [SynthesisError::RecipePanicked {
                recipe: "boom".into(),
                message: "recipe boom".into(),
            }]
        );
    }

    #[test]
    #[should_panic(expected = "recipe boom")]
    fn panicking_builder_unwinds_when_not_caught() {
        let synth = FakeSynthesizer::new(boom_then_host_book()).with_catch_panics(false);
        let mut args = vec![EventArg::Absent, "a!b@c".into()];
        synth.fill(&host_desc(), &FixedParser::new(), &mut args);
    }

    #[test]
    fn output_of_the_wrong_kind_is_ignored() {
        let mut book = RecipeBook::empty();
        book.add(
            ParamKind::Client,
            Recipe::new("echo", vec![ParamKind::Host], |_, args| args.first().cloned()),
        );
        book.add(
            ParamKind::Client,
            Recipe::new("nothing", vec![], |_, _| Some(EventArg::Absent)),
        );
        let synth = FakeSynthesizer::new(book);
        let desc = host_desc();
        let mut args = vec![EventArg::Absent, "a!b@c".into()];

        assert_eq!(synth.fill(&desc, &FixedParser::new(), &mut args), 0);
        assert!(args[0].is_absent());
        assert!(parley_event::check_args(&desc, &args).is_ok());
    }

    #[test]
    fn recipe_receives_parser() {
        let mut book = RecipeBook::empty();
        book.add(
            ParamKind::Text,
            Recipe::new("network", vec![], |parser, _| parser.network().map(EventArg::from)),
        );
        let synth = FakeSynthesizer::new(book);
        let desc = parley_event::CategoryDescriptor::builder("Custom")
            .fakeable("network", ParamKind::Text)
            .build()
            .unwrap();
        let mut args = vec![EventArg::Absent];

        let parser = FixedParser::new().with_network("Libera");
        assert_eq!(synth.fill(&desc, &parser, &mut args), 1);
        assert_eq!(args[0].as_text(), Some("Libera"));
    }
}
