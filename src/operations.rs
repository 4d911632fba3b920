//! Twelve independent triggers, one per failure category.
//!
//! Every function is stateless and returns an [`OperationResult`]. Handles
//! (files, sockets) are locals, so they are dropped on every exit path,
//! including an early return through `?`.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::mem::{align_of, size_of};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use lazy_static::lazy_static;
use tracing::debug;
use url::Url;

use crate::kind::FailureKind;
use crate::signal::{FailureSignal, OperationResult};

fn io_failure(origin: &'static str, path: &Path, err: &io::Error) -> FailureSignal {
    FailureSignal::new(FailureKind::from(err), origin, format!("{}: {}", path.display(), err))
}

// =============================================================================
// Files and streams
// =============================================================================

pub fn open_and_read_file(path: impl AsRef<Path>) -> OperationResult<String> {
    const ORIGIN: &str = "open-and-read-file";
    let path = path.as_ref();
    debug!(path = %path.display(), "reading file");

    let mut file = File::open(path).map_err(|err| io_failure(ORIGIN, path, &err))?;
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|err| io_failure(ORIGIN, path, &err))?;
    Ok(content)
}

/// Open a buffered stream and return its first line without the terminator.
pub fn open_input_stream(path: impl AsRef<Path>) -> OperationResult<String> {
    const ORIGIN: &str = "open-input-stream";
    let path = path.as_ref();
    debug!(path = %path.display(), "opening input stream");

    let mut reader = File::open(path)
        .map(BufReader::new)
        .map_err(|err| io_failure(ORIGIN, path, &err))?;
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .map_err(|err| io_failure(ORIGIN, path, &err))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Read one big-endian `u32` record.
pub fn read_from_stream<R: Read>(mut reader: R) -> OperationResult<u32> {
    const ORIGIN: &str = "read-past-end-of-stream";
    debug!("reading 4-byte record");
    let mut record = [0u8; 4];
    reader.read_exact(&mut record).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => FailureSignal::new(
            FailureKind::EndOfStream,
            ORIGIN,
            "stream ended before a complete 4-byte record",
        ),
        _ => FailureSignal::classify(ORIGIN, &err),
    })?;
    Ok(u32::from_be_bytes(record))
}

// =============================================================================
// External resources and named types
// =============================================================================

/// Connect to a `tcp://host:port` target and return the peer address.
///
/// Every failure along the way (bad URL, wrong scheme, resolution, connect)
/// is reported as malformed input.
pub fn connect_to_external_resource(
    target: &str,
    timeout: Duration,
) -> OperationResult<SocketAddr> {
    const ORIGIN: &str = "connect-to-external-resource";
    let malformed =
        |message: String| FailureSignal::new(FailureKind::MalformedInput, ORIGIN, message);
    debug!(connect_target = target, "resolving connection target");

    let url = Url::parse(target).map_err(|err| {
        FailureSignal::new(
            FailureKind::from(&err),
            ORIGIN,
            format!("invalid connection target '{}': {}", target, err),
        )
    })?;
    if url.scheme() != "tcp" {
        return Err(malformed(format!("unsupported scheme '{}' in '{}'", url.scheme(), target)));
    }
    let host = url
        .host_str()
        .ok_or_else(|| malformed(format!("no host in '{}'", target)))?;
    let port = url
        .port()
        .ok_or_else(|| malformed(format!("no port in '{}'", target)))?;

    let addr = (host, port)
        .to_socket_addrs()
        .map_err(|err| malformed(format!("cannot resolve '{}': {}", host, err)))?
        .next()
        .ok_or_else(|| malformed(format!("'{}' resolved to no address", host)))?;

    debug!(%addr, ?timeout, "connecting");
    let stream = TcpStream::connect_timeout(&addr, timeout)
        .map_err(|err| malformed(format!("cannot connect to {}: {}", addr, err)))?;
    stream
        .peer_addr()
        .map_err(|err| malformed(format!("connection to {} lost: {}", addr, err)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub name: &'static str,
    pub size: usize,
    pub align: usize,
}

impl TypeDescriptor {
    fn of<T>(name: &'static str) -> Self {
        Self {
            name,
            size: size_of::<T>(),
            align: align_of::<T>(),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (size {}, align {})", self.name, self.size, self.align)
    }
}

lazy_static! {
    static ref TYPE_REGISTRY: HashMap<&'static str, TypeDescriptor> = {
        let mut registry = HashMap::new();
        registry.insert("bool", TypeDescriptor::of::<bool>("bool"));
        registry.insert("char", TypeDescriptor::of::<char>("char"));
        registry.insert("i32", TypeDescriptor::of::<i32>("i32"));
        registry.insert("i64", TypeDescriptor::of::<i64>("i64"));
        registry.insert("u8", TypeDescriptor::of::<u8>("u8"));
        registry.insert("u64", TypeDescriptor::of::<u64>("u64"));
        registry.insert("usize", TypeDescriptor::of::<usize>("usize"));
        registry.insert("f64", TypeDescriptor::of::<f64>("f64"));
        registry.insert("String", TypeDescriptor::of::<String>("String"));
        registry.insert("PathBuf", TypeDescriptor::of::<std::path::PathBuf>("PathBuf"));
        registry
    };
}

/// Resolve a type by its short name.
pub fn load_named_type(name: &str) -> OperationResult<TypeDescriptor> {
    debug!(requested = name, "looking up type");
    TYPE_REGISTRY.get(name.trim()).copied().ok_or_else(|| {
        FailureSignal::new(
            FailureKind::ResourceNotFound,
            "load-named-type",
            format!("type '{}' is not registered", name),
        )
    })
}

// =============================================================================
// Arithmetic, references, indexing, casting
// =============================================================================

pub fn divide(dividend: i32, divisor: i32) -> OperationResult<i32> {
    const ORIGIN: &str = "divide";
    debug!(dividend, divisor, "dividing");
    if divisor == 0 {
        return Err(FailureSignal::new(FailureKind::InvalidArgument, ORIGIN, "division by zero"));
    }
    dividend.checked_div(divisor).ok_or_else(|| {
        FailureSignal::new(FailureKind::InvalidArgument, ORIGIN, "division overflow")
    })
}

/// Length of the referenced text, if there is a reference at all.
pub fn dereference_null(reference: Option<&str>) -> OperationResult<usize> {
    debug!(present = reference.is_some(), "dereferencing");
    reference.map(str::len).ok_or_else(|| {
        FailureSignal::new(FailureKind::InvalidState, "dereference-null", "reference is absent")
    })
}

pub fn index_access<T: Copy>(items: &[T], index: usize) -> OperationResult<T> {
    debug!(index, len = items.len(), "indexing");
    items.get(index).copied().ok_or_else(|| {
        FailureSignal::new(
            FailureKind::OutOfRange,
            "index-access",
            format!("index {} out of bounds for length {}", index, items.len()),
        )
    })
}

pub fn type_cast<T: Any + Clone>(value: &dyn Any) -> OperationResult<T> {
    debug!(cast_to = type_name::<T>(), "downcasting");
    value.downcast_ref::<T>().cloned().ok_or_else(|| {
        FailureSignal::new(
            FailureKind::InvalidTypeConversion,
            "type-cast",
            format!("value cannot be cast to {}", type_name::<T>()),
        )
    })
}

// =============================================================================
// Validation
// =============================================================================

/// Scheduling priority, always within `Priority::MIN..=Priority::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Priority(u8);

impl Priority {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 10;

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "priority {}", self.0)
    }
}

pub fn set_priority(value: i32) -> OperationResult<Priority> {
    debug!(value, "setting priority");
    if !(Priority::MIN..=Priority::MAX).contains(&value) {
        return Err(FailureSignal::new(
            FailureKind::InvalidArgument,
            "set-priority",
            format!(
                "priority {} outside accepted range {}..={}",
                value,
                Priority::MIN,
                Priority::MAX
            ),
        ));
    }
    // Range check above keeps this within u8.
    Ok(Priority(value as u8))
}

pub fn parse_integer(input: &str) -> OperationResult<i32> {
    debug!(input, "parsing integer");
    input.trim().parse::<i32>().map_err(|err| {
        FailureSignal::new(
            FailureKind::from(&err),
            "parse-integer",
            format!("cannot parse \"{}\" as an integer: {}", input, err),
        )
    })
}

/// Fails with `message` verbatim when `condition` does not hold.
pub fn custom_validation(condition: bool, message: &str) -> OperationResult<()> {
    debug!(condition, "validating");
    if condition {
        Ok(())
    } else {
        Err(FailureSignal::new(FailureKind::DomainSpecific, "custom-validation", message))
    }
}
