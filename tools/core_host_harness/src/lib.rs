//! Host-side compilation target for the firmware's hardware-independent
//! core. The actual coverage lives in `tests/firmware_core.rs`, which
//! mounts the classifier, calibrator, sequencer, board, and flow sources
//! directly so their unit tests run under the host toolchain.
