use std::{fmt, result};

/// Error taxonomy surfaced by this crate. Mirrors the kinds named in
/// the store's error-handling design: most variants are background-thread
/// or storage-engine internals and are logged rather than propagated;
/// `InvalidArgument`, `AtomicStateInvalid` and `Capacity` are the only
/// variants client-facing engine operations are expected to return.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// Bad key pattern, blank value, unsupported operator on the `$id` key.
    InvalidArgument(String, String),
    /// Broker rejected a lease request (shutdown, or upstream security denial).
    SecurityDenied(String, String),
    /// Buffer cannot accept a new page; back-pressure signal, not a bug.
    Capacity(String, String),
    /// A segment is missing one of its companion files.
    MalformedSegment(String, String),
    /// A read-fence failed during atomic/transaction commit; caller should retry.
    AtomicStateInvalid(String, String),
    /// A buffer page was truncated mid-write.
    Corruption(String, String),
    /// A background thread observed an interrupt.
    Interrupted(String, String),
    /// I/O failure during drain that could not be completed.
    Fatal(String, String),
    /// Catch-all for I/O errors not otherwise classified.
    IOError(String, String),
    /// A background thread panicked or its channel disconnected.
    ThreadFail(String, String),
    /// Inter-process/inter-thread channel send/recv failed.
    IPCFail(String, String),
    /// A numeric conversion failed (e.g. usize -> isize footprint).
    FailConvert(String, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Error::*;

        match self {
            InvalidArgument(p, msg) => write!(f, "InvalidArgument at {}, {}", p, msg),
            SecurityDenied(p, msg) => write!(f, "SecurityDenied at {}, {}", p, msg),
            Capacity(p, msg) => write!(f, "Capacity at {}, {}", p, msg),
            MalformedSegment(p, msg) => write!(f, "MalformedSegment at {}, {}", p, msg),
            AtomicStateInvalid(p, msg) => write!(f, "AtomicStateInvalid at {}, {}", p, msg),
            Corruption(p, msg) => write!(f, "Corruption at {}, {}", p, msg),
            Interrupted(p, msg) => write!(f, "Interrupted at {}, {}", p, msg),
            Fatal(p, msg) => write!(f, "Fatal at {}, {}", p, msg),
            IOError(p, msg) => write!(f, "IOError at {}, {}", p, msg),
            ThreadFail(p, msg) => write!(f, "ThreadFail at {}, {}", p, msg),
            IPCFail(p, msg) => write!(f, "IPCFail at {}, {}", p, msg),
            FailConvert(p, msg) => write!(f, "FailConvert at {}, {}", p, msg),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

/// Construct an `Error` tagging it with the call-site, mirroring the
/// `err_at!` convention used throughout the storage engine: either wrap
/// a `source` error's `Display` output, or format a `msg` directly.
///
/// ```ignore
/// err_at!(IOError, fs::read_dir(&dir))?;
/// err_at!(InvalidArgument, msg: "bad key {:?}", key)?;
/// ```
#[macro_export]
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        let prefix = format!("{}:{}", file!(), line!());
        Err($crate::Error::$v(prefix, format!($($arg),+)))
    }};
    ($v:ident, $e:expr) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                Err($crate::Error::$v(prefix, format!("{}", err)))
            }
        }
    }};
    ($v:ident, $e:expr, $($arg:expr),+) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                let msg = format!($($arg),+);
                Err($crate::Error::$v(prefix, format!("{}, {}", msg, err)))
            }
        }
    }};
}
