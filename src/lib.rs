//! Rayo: Fixed-Width SIMD Vector and Matrix Algebra
//!
//! **Rayo** (Spanish: "lightning bolt") provides 2-, 3- and 4-component vectors
//! over `f32`, `f64` and `i32`, plus 3x3 and 4x4 float matrices, for real-time
//! graphics and simulation code.
//!
//! Four back-ends implement the same logical contract:
//!
//! 1. **Scalar** - portable baseline, the correctness reference
//! 2. **SSE2** - x86/x86_64 128-bit SIMD (SSE4.1 paths when enabled)
//! 3. **AVX2** - x86_64 256-bit SIMD (f64 vectors in one register)
//! 4. **NEON** - AArch64 128-bit SIMD
//!
//! # Design Principles
//!
//! - **Compile-time dispatch**: exactly one back-end per build, chosen from
//!   target features. No runtime branch sits inside a vector operation.
//! - **Padding never leaks**: 2- and 3-component vectors live in 4-wide
//!   registers; unused lanes hold zero after every operation.
//! - **Same answer everywhere**: non-transcendental operations are bit-identical
//!   across back-ends, including horizontal reductions.
//! - **Zero unsafe in public API**: `unsafe` is isolated in `backends`.
//!
//! # Quick Start
//!
//! ```rust
//! use rayo::{Predicate, Vec3f};
//!
//! let a = Vec3f::new(2.0, 3.0, 4.0);
//! let b = Vec3f::new(1.0, 0.0, 0.0);
//!
//! assert_eq!(a.sum(), 9.0);
//! assert_eq!(a.product(), 24.0);
//! assert_eq!(a.dot(b), 2.0);
//! assert!(a.compare(Predicate::AnyGT, b));
//! ```

pub mod backends;
pub mod compare;
pub mod error;
mod fastmath;
pub mod fields;
pub mod lanes;
pub mod matrix;
pub mod vector;

pub use backends::ActiveBackend;
pub use compare::{LaneMask, OrdinalKey, Predicate};
pub use error::{RayoError, Result};
pub use fields::{FieldVisitor, VisitFields};
pub use lanes::{Element, ElementKind, FloatElement, IntElement, PaddingFill, RegisterShape};
pub use matrix::{CompactMatrix3, CompactMatrix4, Matrix3, Matrix4};
pub use vector::{
    Vec2d, Vec2f, Vec2i, Vec3d, Vec3f, Vec3i, Vec4d, Vec4f, Vec4i, Vector,
};

/// Backend execution target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Scalar fallback (no SIMD)
    Scalar,
    /// SSE2 (x86 baseline, 128-bit)
    SSE2,
    /// AVX2 (256-bit)
    AVX2,
    /// ARM NEON (AArch64, 128-bit)
    NEON,
}

impl Backend {
    /// Widest register the back-end computes in, in bits
    ///
    /// The scalar back-end reports the 128 bits of its logical 4-lane layout.
    pub const fn register_bits(self) -> u32 {
        match self {
            Backend::Scalar | Backend::SSE2 | Backend::NEON => 128,
            Backend::AVX2 => 256,
        }
    }

    /// Stable display name
    pub const fn name(self) -> &'static str {
        match self {
            Backend::Scalar => "scalar",
            Backend::SSE2 => "sse2",
            Backend::AVX2 => "avx2",
            Backend::NEON => "neon",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The back-end compiled into this build
///
/// Selection follows this priority, evaluated once by the compiler:
///
/// 1. Scalar, if the `force-scalar` feature is enabled
/// 2. AVX2, if `avx2` is a compile-time target feature
/// 3. SSE2, on x86/x86_64 with `sse2` (always true on x86_64)
/// 4. NEON, on AArch64 with `neon`
/// 5. Scalar otherwise
///
/// # Examples
///
/// ```
/// use rayo::{Backend, ACTIVE_BACKEND};
///
/// #[cfg(all(target_arch = "x86_64", not(feature = "force-scalar")))]
/// assert_ne!(ACTIVE_BACKEND, Backend::Scalar);
/// println!("Using backend: {ACTIVE_BACKEND}");
/// ```
pub const ACTIVE_BACKEND: Backend = backends::SELECTED;

/// Report the compiled back-end through `tracing`
///
/// Selection happens at build time, so this only logs; call it once at
/// application start-up when diagnosing performance.
pub fn log_backend_selection() -> Backend {
    #[cfg(feature = "tracing")]
    tracing::debug!(
        backend = ACTIVE_BACKEND.name(),
        register_bits = ACTIVE_BACKEND.register_bits(),
        "rayo back-end selected at build time"
    );
    ACTIVE_BACKEND
}
