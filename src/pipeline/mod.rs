//! Pipeline stages for image-to-HTML conversion.
//!
//! Each submodule implements exactly one transformation step so it can be
//! tested on its own. Only [`llm`] touches the network; [`extract`] and
//! [`assemble`] are pure string functions.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ encode ──▶ llm ──▶ extract ──▶ assemble ──▶ output
//! (path)    (base64)   (VLM)   (fences)    (<link>)     (files)
//! ```
//!
//! 1. [`input`]    — expand and absolutise the path, check the file, pick
//!    the credential, detect the MIME type
//! 2. [`encode`]   — read the bytes and wrap them as a base64 [`encode::ImageAsset`]
//! 3. [`llm`]      — one chat-completion call with the image as a data URL
//! 4. [`extract`]  — recover the `html` / `css` fenced blocks from the reply
//! 5. [`assemble`] — decide whether CSS is externalised and link it from the page

pub mod assemble;
pub mod encode;
pub mod extract;
pub mod input;
pub mod llm;
