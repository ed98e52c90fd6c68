//! Host-based test suites for the Morse link station

#[cfg(test)]
mod link_tests;
#[cfg(test)]
mod pin_tests;
