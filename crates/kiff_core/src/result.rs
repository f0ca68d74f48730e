//! Tagged setup outcomes
//!
//! Every fallible bootstrap step returns an [`Outcome`]: a [`ResultCode`]
//! plus a payload that is present only on success. Callers check the code
//! first; taking the value of a failed outcome is a programming error and
//! goes down the fatal path.

use std::fmt;

/// A code that describes the result of a setup operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ResultCode {
    /// The operation succeeded and carries a value
    Success = 0,
    /// Generic failure, e.g. no physical devices enumerated
    GenericError = 1,
    /// A required validation layer is not installed
    ValidationLayerNotPresent = 2,
    /// No enumerated physical device met the selection criteria
    SuitablePhysicalDeviceNotFound = 3,
    /// Logical device creation was rejected by the driver
    CreateDeviceFailed = 4,
    /// The driver reported a failure with no finer-grained mapping
    Unknown = 5,
    /// A raw code outside the known range
    UndefinedCode = 6,
    /// No queue family with the required capabilities exists
    CouldNotFindQueueFamilyIndices = 7,
}

impl ResultCode {
    /// Map a raw integer code back to a [`ResultCode`]
    ///
    /// Anything outside the known range becomes [`ResultCode::UndefinedCode`].
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::Success,
            1 => Self::GenericError,
            2 => Self::ValidationLayerNotPresent,
            3 => Self::SuitablePhysicalDeviceNotFound,
            4 => Self::CreateDeviceFailed,
            5 => Self::Unknown,
            7 => Self::CouldNotFindQueueFamilyIndices,
            _ => Self::UndefinedCode,
        }
    }

    /// Raw integer value of this code
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Stable description used in log output
    pub const fn name(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::GenericError => "GENERIC_ERROR",
            Self::ValidationLayerNotPresent => "VALIDATION_LAYER_NOT_PRESENT",
            Self::SuitablePhysicalDeviceNotFound => "SUITABLE_PHYSICAL_DEVICE_NOT_FOUND",
            Self::CreateDeviceFailed => "CREATE_DEVICE_FAILED",
            Self::Unknown => "UNKNOWN",
            Self::UndefinedCode => "UNDEFINED_CODE",
            Self::CouldNotFindQueueFamilyIndices => "COULD_NOT_FIND_QUEUE_FAMILY_INDICES",
        }
    }

    /// Whether this code reports success
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::error::Error for ResultCode {}

/// Result code paired with an optional payload
///
/// The payload is present iff the code is [`ResultCode::Success`]; the
/// constructors are the only way to build one, so the pairing always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Outcome<T> {
    code: ResultCode,
    value: Option<T>,
}

impl<T> Outcome<T> {
    /// Successful outcome carrying `value`
    pub const fn success(value: T) -> Self {
        Self {
            code: ResultCode::Success,
            value: Some(value),
        }
    }

    /// Failed outcome with no payload
    ///
    /// A `Success` code here would break the payload invariant, so it is
    /// demoted to [`ResultCode::UndefinedCode`].
    pub fn failure(code: ResultCode) -> Self {
        debug_assert!(!code.is_success(), "failure outcome built with a success code");
        let code = if code.is_success() {
            ResultCode::UndefinedCode
        } else {
            code
        };
        Self { code, value: None }
    }

    /// The result code
    pub const fn code(&self) -> ResultCode {
        self.code
    }

    /// Whether a payload is present
    pub const fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Take the payload, transferring ownership to the caller
    ///
    /// # Panics
    ///
    /// Panics (after logging) when called on a failed outcome.
    #[track_caller]
    pub fn into_value(self) -> T {
        match self.value {
            Some(value) => value,
            None => {
                log::error!("No value found (result code {})", self.code);
                panic!("No value found (result code {})", self.code);
            }
        }
    }

    /// Convert into a standard `Result` so `?` can be used
    pub fn into_result(self) -> Result<T, ResultCode> {
        match self.value {
            Some(value) => Ok(value),
            None => Err(self.code),
        }
    }

    /// Map the payload of a successful outcome
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            code: self.code,
            value: self.value.map(f),
        }
    }
}
