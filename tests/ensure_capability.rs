mod common;

use common::FakeProvider;
use htmlpress::engine::{Availability, CapabilityProvider};
use htmlpress::ensure::ensure_capability;

#[test]
fn available_renderer_skips_install() {
    let provider = FakeProvider::already_available();
    assert!(ensure_capability(&provider, true).is_some());
    assert_eq!(provider.installs.get(), 0);
    assert_eq!(provider.resolves.get(), 1);
}

#[test]
fn successful_install_makes_renderer_available() {
    let provider = FakeProvider::installable(true);
    assert!(ensure_capability(&provider, true).is_some());
    assert_eq!(provider.installs.get(), 1);
    assert_eq!(provider.resolves.get(), 2);
}

#[test]
fn failed_install_reports_unavailable() {
    let provider = FakeProvider::installable(false);
    assert!(ensure_capability(&provider, true).is_none());
    assert_eq!(provider.installs.get(), 1);
    // no re-resolve after a failed install
    assert_eq!(provider.resolves.get(), 1);
}

#[test]
fn install_disabled_never_installs() {
    let provider = FakeProvider::installable(true);
    assert!(ensure_capability(&provider, false).is_none());
    assert_eq!(provider.installs.get(), 0);
}

#[test]
fn availability_states() {
    assert!(matches!(
        FakeProvider::already_available().availability(),
        Availability::AlreadyAvailable { .. }
    ));
    assert!(matches!(
        FakeProvider::installable(true).availability(),
        Availability::Installable { .. }
    ));
    match FakeProvider::unavailable().availability() {
        Availability::Unavailable { reason } => assert!(reason.contains("fakeprint")),
        other => panic!("unexpected availability: {other:?}"),
    }
}
