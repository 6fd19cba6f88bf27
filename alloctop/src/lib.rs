//! # alloctop - Userspace Client for the Kernel alloc-top Sampler
//!
//! `alloctop` controls an in-kernel memory-allocation sampler and exports its
//! findings. It is purely a control-and-extraction client: it does not
//! aggregate or analyze what the sampler records.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │               Kernel alloc-top Sampler                │
//! │        (out of scope — wire contract only)            │
//! └──────────────┬────────────────────────────────────────┘
//!                │ ioctl / numbered syscall
//!                ▼
//! ┌───────────────────────────────────────────────────────┐
//! │                alloctop (this crate)                  │
//! │                                                       │
//! │  ┌───────────┐   ┌───────────┐   ┌────────────────┐  │
//! │  │ Transport │──▶│  Record   │──▶│   Renderers    │  │
//! │  │ (2 modes) │   │  Decoder  │   │ table / JSON / │  │
//! │  └───────────┘   └───────────┘   │  file+syslog   │  │
//! │        ▲                         └────────────────┘  │
//! │        │          ┌───────────┐                       │
//! │        └──────────│ PollLoop  │  (10 s export cycle)  │
//! │                   └───────────┘                       │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`transport`]: the two control paths to the sampler (ioctl device and
//!   raw syscall) behind one trait, plus the feature activation registry
//! - [`record`]: variant-buffer walking and record decoding
//! - [`render`]: console table and settings-JSON formatting
//! - [`export`]: file/syslog sinks and the per-record export documents
//! - [`poll`]: the continuous dump → decode → export cycle
//! - [`commands`]: one handler per CLI action
//! - [`params`]: the `key=value,key=value` option-string mini-language
//! - [`cli`]: command-line argument definitions
//! - [`domain`]: id newtypes and structured errors
//!
//! ## Typical Usage
//!
//! ```bash
//! # Enable the sampler, keeping the 50 largest allocators
//! alloctop --activate=top=50,verbose=1
//!
//! # One-shot table of the current top list
//! alloctop --report
//!
//! # Export records to a file and syslog every 10 seconds
//! alloctop --log=sls=/tmp/alloc-top.log,syslog=1
//! ```

// Expose modules for testing
pub mod cli;
pub mod commands;
pub mod domain;
pub mod export;
pub mod params;
pub mod poll;
pub mod record;
pub mod render;
pub mod transport;
