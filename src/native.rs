//! [`ExternalEvaluator`] backed by a native shared library.
//!
//! The library exports a small C interface:
//!
//! ```text
//! void        init_db(void);
//! void        start_game(const char* category);
//! void        check_word_guess(const char* guess, int* out_statuses);
//! const char* get_secret(void);
//! int         get_lives(void);
//! int         get_game_status(void);
//! ```
//!
//! Every symbol is optional. They are resolved once in [`NativeEvaluator::load`];
//! strings returned by the library are copied before the call returns because
//! the library does not document how long its buffers stay valid.

use crate::evaluator::{Capabilities, Capability, EvaluatorError, ExternalEvaluator};
use crate::scoring::LetterStatus;
use crate::wordbank::EMBEDDED_WORDBANK;
use crate::{debug_log, info_log};
use std::fs;
use std::path::{Path, PathBuf};

/// File name the native module reads its own word list from.
pub const NATIVE_WORD_LIST: &str = "words.txt";

/// Puts a word list next to the library unless one is already there.
///
/// `catalog` is copied when given; otherwise the embedded list is written.
/// Returns the staged path when a file was created.
pub fn stage_word_list(library: &Path, catalog: Option<&Path>) -> Option<PathBuf> {
    let dir = library.parent()?;
    let target = dir.join(NATIVE_WORD_LIST);
    if target.exists() {
        debug_log!(
            "{} already present next to evaluator, leaving it alone",
            target.display()
        );
        return None;
    }
    let staged = match catalog {
        Some(catalog) => fs::copy(catalog, &target).map(|_| ()),
        None => fs::write(&target, EMBEDDED_WORDBANK),
    };
    match staged {
        Ok(()) => {
            info_log!("Staged word list at {}", target.display());
            Some(target)
        }
        Err(e) => {
            log::warn!("Failed to stage word list at {}: {e}", target.display());
            None
        }
    }
}

#[cfg(unix)]
pub use unix::NativeEvaluator;

#[cfg(not(unix))]
pub use fallback::NativeEvaluator;

#[cfg(unix)]
mod unix {
    use super::{Capabilities, Capability, EvaluatorError, ExternalEvaluator, LetterStatus};
    use crate::evaluator::decode_statuses;
    use crate::info_log;
    use std::ffi::{CStr, CString, c_char, c_int, c_void};
    use std::os::unix::ffi::OsStrExt;
    use std::path::Path;

    type InitFn = unsafe extern "C" fn();
    type StartGameFn = unsafe extern "C" fn(*const c_char);
    type CheckWordFn = unsafe extern "C" fn(*const c_char, *mut c_int);
    type GetSecretFn = unsafe extern "C" fn() -> *const c_char;
    type GetIntFn = unsafe extern "C" fn() -> c_int;

    /// Owned `dlopen` handle, closed on drop.
    struct Library {
        handle: *mut c_void,
    }

    impl Library {
        fn open(path: &Path) -> Result<Self, EvaluatorError> {
            let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| {
                EvaluatorError::LoadFailed {
                    path: path.to_path_buf(),
                    reason: "path contains a NUL byte".to_string(),
                }
            })?;
            // SAFETY: c_path is a valid NUL-terminated string for the duration of the call.
            let handle = unsafe { libc::dlopen(c_path.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };
            if handle.is_null() {
                return Err(EvaluatorError::LoadFailed {
                    path: path.to_path_buf(),
                    reason: last_dl_error(),
                });
            }
            Ok(Self { handle })
        }

        fn symbol(&self, name: &str) -> Option<*mut c_void> {
            let c_name = CString::new(name).ok()?;
            // SAFETY: handle is open for the lifetime of self and c_name is NUL-terminated.
            let ptr = unsafe { libc::dlsym(self.handle, c_name.as_ptr()) };
            (!ptr.is_null()).then_some(ptr)
        }
    }

    impl Drop for Library {
        fn drop(&mut self) {
            // SAFETY: handle came from a successful dlopen and is closed exactly once.
            unsafe {
                libc::dlclose(self.handle);
            }
        }
    }

    fn last_dl_error() -> String {
        // SAFETY: dlerror returns either NULL or a NUL-terminated string owned by libc.
        unsafe {
            let err = libc::dlerror();
            if err.is_null() {
                "unknown dynamic loader error".to_string()
            } else {
                CStr::from_ptr(err).to_string_lossy().into_owned()
            }
        }
    }

    /// Resolved entry points. A `None` entry is a capability the library lacks.
    struct Symbols {
        init: Option<InitFn>,
        start_game: Option<StartGameFn>,
        check_word: Option<CheckWordFn>,
        get_secret: Option<GetSecretFn>,
        get_lives: Option<GetIntFn>,
        get_status: Option<GetIntFn>,
    }

    impl Symbols {
        fn resolve(lib: &Library) -> Self {
            // SAFETY: each symbol is cast to the signature documented for the
            // native module; a library exporting a different signature under
            // the same name violates that contract.
            unsafe {
                Self {
                    init: lib
                        .symbol("init_db")
                        .map(|p| std::mem::transmute::<*mut c_void, InitFn>(p)),
                    start_game: lib
                        .symbol("start_game")
                        .map(|p| std::mem::transmute::<*mut c_void, StartGameFn>(p)),
                    check_word: lib
                        .symbol("check_word_guess")
                        .map(|p| std::mem::transmute::<*mut c_void, CheckWordFn>(p)),
                    get_secret: lib
                        .symbol("get_secret")
                        .map(|p| std::mem::transmute::<*mut c_void, GetSecretFn>(p)),
                    get_lives: lib
                        .symbol("get_lives")
                        .map(|p| std::mem::transmute::<*mut c_void, GetIntFn>(p)),
                    get_status: lib
                        .symbol("get_game_status")
                        .map(|p| std::mem::transmute::<*mut c_void, GetIntFn>(p)),
                }
            }
        }

        fn capabilities(&self) -> Capabilities {
            let mut caps = Capabilities::NONE;
            let present = [
                (Capability::Initialize, self.init.is_some()),
                (Capability::StartGame, self.start_game.is_some()),
                (Capability::CheckGuess, self.check_word.is_some()),
                (Capability::Secret, self.get_secret.is_some()),
                (Capability::RemainingAttempts, self.get_lives.is_some()),
                (Capability::Outcome, self.get_status.is_some()),
            ];
            for (cap, is_present) in present {
                if is_present {
                    caps = caps.with(cap);
                }
            }
            caps
        }
    }

    pub struct NativeEvaluator {
        // Field order matters: symbols must not outlive the library.
        symbols: Symbols,
        capabilities: Capabilities,
        _library: Library,
    }

    impl NativeEvaluator {
        /// Opens the library, resolves its exports and runs `init_db` if present.
        pub fn load(path: &Path) -> Result<Self, EvaluatorError> {
            let library = Library::open(path)?;
            let symbols = Symbols::resolve(&library);
            let capabilities = symbols.capabilities();
            info_log!(
                "Loaded evaluator {} with capabilities: {}",
                path.display(),
                capabilities
            );
            if let Some(init) = symbols.init {
                // SAFETY: init_db takes no arguments.
                unsafe { init() };
            }
            Ok(Self {
                symbols,
                capabilities,
                _library: library,
            })
        }

        fn c_string(capability: Capability, text: &str) -> Result<CString, EvaluatorError> {
            CString::new(text).map_err(|_| EvaluatorError::CallFailed {
                capability,
                reason: "argument contains a NUL byte".to_string(),
            })
        }
    }

    impl ExternalEvaluator for NativeEvaluator {
        fn capabilities(&self) -> Capabilities {
            self.capabilities
        }

        fn start_game(&mut self, category: &str) -> Result<(), EvaluatorError> {
            let start = self
                .symbols
                .start_game
                .ok_or(EvaluatorError::Unavailable(Capability::StartGame))?;
            let category = Self::c_string(Capability::StartGame, category)?;
            // SAFETY: category is NUL-terminated and outlives the call.
            unsafe { start(category.as_ptr()) };
            Ok(())
        }

        fn check_guess(&mut self, word: &str) -> Result<Vec<LetterStatus>, EvaluatorError> {
            let check = self
                .symbols
                .check_word
                .ok_or(EvaluatorError::Unavailable(Capability::CheckGuess))?;
            let len = word.chars().count();
            let c_word = Self::c_string(Capability::CheckGuess, word)?;
            // Pre-filled with an invalid code so untouched slots are detected.
            let mut out: Vec<c_int> = vec![-1; len];
            // SAFETY: the library writes one status per letter of the guess and
            // out holds exactly that many slots.
            unsafe { check(c_word.as_ptr(), out.as_mut_ptr()) };
            decode_statuses(&out, len)
        }

        fn secret(&mut self) -> Result<String, EvaluatorError> {
            let get = self
                .symbols
                .get_secret
                .ok_or(EvaluatorError::Unavailable(Capability::Secret))?;
            // SAFETY: get_secret takes no arguments and returns NULL or a NUL-terminated string.
            let ptr = unsafe { get() };
            if ptr.is_null() {
                return Ok(String::new());
            }
            // SAFETY: ptr is non-null and NUL-terminated; the bytes are copied
            // out immediately and the pointer is not kept.
            let bytes = unsafe { CStr::from_ptr(ptr) }.to_bytes().to_vec();
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }

        fn remaining_attempts(&mut self) -> Result<i32, EvaluatorError> {
            let get = self
                .symbols
                .get_lives
                .ok_or(EvaluatorError::Unavailable(Capability::RemainingAttempts))?;
            // SAFETY: get_lives takes no arguments.
            Ok(unsafe { get() })
        }

        fn outcome(&mut self) -> Result<i32, EvaluatorError> {
            let get = self
                .symbols
                .get_status
                .ok_or(EvaluatorError::Unavailable(Capability::Outcome))?;
            // SAFETY: get_game_status takes no arguments.
            Ok(unsafe { get() })
        }
    }
}

#[cfg(not(unix))]
mod fallback {
    use super::{Capabilities, EvaluatorError, ExternalEvaluator, LetterStatus};
    use std::path::Path;

    pub struct NativeEvaluator {
        _private: (),
    }

    impl NativeEvaluator {
        pub fn load(_path: &Path) -> Result<Self, EvaluatorError> {
            Err(EvaluatorError::Unsupported)
        }
    }

    impl ExternalEvaluator for NativeEvaluator {
        fn capabilities(&self) -> Capabilities {
            Capabilities::NONE
        }

        fn start_game(&mut self, _category: &str) -> Result<(), EvaluatorError> {
            Err(EvaluatorError::Unsupported)
        }

        fn check_guess(&mut self, _word: &str) -> Result<Vec<LetterStatus>, EvaluatorError> {
            Err(EvaluatorError::Unsupported)
        }

        fn secret(&mut self) -> Result<String, EvaluatorError> {
            Err(EvaluatorError::Unsupported)
        }

        fn remaining_attempts(&mut self) -> Result<i32, EvaluatorError> {
            Err(EvaluatorError::Unsupported)
        }

        fn outcome(&mut self) -> Result<i32, EvaluatorError> {
            Err(EvaluatorError::Unsupported)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_library_fails() {
        let result = NativeEvaluator::load(Path::new("/nonexistent/libgame_core.so"));
        assert!(result.is_err());
    }

    #[test]
    fn test_stage_word_list_copies_once() {
        let dir = tempfile::tempdir().unwrap();
        let library = dir.path().join("libgame_core.so");
        let catalog = dir.path().join("catalog.txt");
        fs::write(&catalog, "CRANE\n").unwrap();

        let staged = stage_word_list(&library, Some(&catalog)).unwrap();
        assert_eq!(fs::read_to_string(&staged).unwrap(), "CRANE\n");

        fs::write(&catalog, "SLATE\n").unwrap();
        assert!(stage_word_list(&library, Some(&catalog)).is_none());
        assert!(stage_word_list(&library, None).is_none());
        assert_eq!(fs::read_to_string(&staged).unwrap(), "CRANE\n");
    }

    #[test]
    fn test_stage_embedded_word_list() {
        let dir = tempfile::tempdir().unwrap();
        let library = dir.path().join("libgame_core.so");

        let staged = stage_word_list(&library, None).unwrap();
        assert_eq!(staged, dir.path().join(NATIVE_WORD_LIST));
        assert_eq!(fs::read_to_string(&staged).unwrap(), EMBEDDED_WORDBANK);

        // A list placed by the user is never replaced
        fs::write(&staged, "PLANT\n").unwrap();
        assert!(stage_word_list(&library, None).is_none());
        assert_eq!(fs::read_to_string(&staged).unwrap(), "PLANT\n");
    }
}
