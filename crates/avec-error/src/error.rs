use core::{
    error,
    fmt::{self, Display, Debug, Formatter},
};

use avec_proc::Error;

use crate::{Location, Tracked};

type BoxedContext = Box<dyn Display + Send + Sync>;

type BoxedSource = Box<dyn error::Error + Send + Sync>;

struct Chain {
    ctx: BoxedContext,
    err: Option<BoxedSource>,
}

impl Chain {

    #[inline(always)]
    fn context(&self) -> &(dyn Display + Send + Sync) {
        &*self.ctx
    }

    #[inline(always)]
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.err.as_deref().map(|err| err as &(dyn error::Error + 'static))
    }
}

/// A context message, optionally wrapping the error that caused it.
///
/// Scenario runners attach a message to every fallible array operation, so a
/// failure reads as "what was being checked" followed by the array error.
#[derive(Error)] #[display(self.chain.context())]
pub struct Error {
    #[source(self.chain.source())] chain: Chain,
    loc: Option<Location>,
}

impl Error {

    #[inline(always)]
    pub fn new<C>(ctx: C, err: impl error::Error + Send + Sync + 'static) -> Self
        where C: Display + Send + Sync + 'static,
    {
        Self::new_internal(ctx, err, None)
    }

    #[track_caller]
    pub fn new_tracked<C>(ctx: C, err: impl error::Error + Send + Sync + 'static) -> Self
        where C: Display + Send + Sync + 'static,
    {
        Self::new_internal(ctx, err, Some(caller!()))
    }

    #[inline(always)]
    pub fn just_context<C>(ctx: C) -> Self
        where C: Display + Send + Sync + 'static,
    {
        Self::from_parts(Box::new(ctx), None, None)
    }

    #[track_caller]
    pub fn just_context_tracked<C>(ctx: C) -> Self
        where C: Display + Send + Sync + 'static,
    {
        Self::from_parts(Box::new(ctx), None, Some(caller!()))
    }

    pub(crate) fn new_internal(
        ctx: impl Display + Send + Sync + 'static,
        err: impl error::Error + Send + Sync + 'static,
        loc: Option<Location>,
    ) -> Self
    {
        Self::from_parts(Box::new(ctx), Some(Box::new(err)), loc)
    }

    fn from_parts(ctx: BoxedContext, err: Option<BoxedSource>, loc: Option<Location>) -> Self {
        Self {
            chain: Chain { ctx, err },
            loc,
        }
    }

    /// `true` when this error wraps an underlying cause.
    #[inline(always)]
    pub fn has_source(&self) -> bool {
        self.chain.err.is_some()
    }
}

impl Debug for Error {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Error(ctx: {}", self.chain.ctx)?;
        match &self.chain.err {
            Some(err) => write!(f, ", err: {:?}", err)?,
            None => f.write_str(", err: None")?,
        }
        if let Some(loc) = self.loc {
            write!(f, ", at: {}", loc)?;
        }
        f.write_str(")")
    }
}

impl Tracked for Error {

    #[inline(always)]
    fn location(&self) -> Option<Location> {
        self.loc
    }
}
