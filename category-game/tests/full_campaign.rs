use category_game::{
    CloseChoice, ContentChoice, Decision, EnergyAllocation, Ending, FortressChoice, GameStatus,
    HiringChoice, LogKind, MessagingChoice, PositioningChoice, SessionEvent, Stage, StageSession,
    ValueEquation,
};

fn strongest_line() -> [Decision; 8] {
    [
        Decision::Positioning(PositioningChoice::NicheDown),
        Decision::DeployOffer,
        Decision::Messaging(MessagingChoice::OutcomePromise),
        Decision::Content(ContentChoice::InsiderGuide),
        Decision::Hunt,
        Decision::Fortress(FortressChoice::Reinvest),
        Decision::Hiring(HiringChoice::Patriot),
        Decision::Close(CloseChoice::Reframe),
    ]
}

#[test]
fn strongest_line_survives_all_eight_sectors() {
    let mut session = StageSession::new();
    assert!(session.start_session());
    *session.offer_mut() = ValueEquation::new(10, 10, 1, 1);
    *session.energy_mut() = EnergyAllocation::new(40, 30, 30, 0);

    let expected = [
        (10_000, 25),
        (17_000, 40),
        (21_000, 50),
        (24_000, 70),
        (34_000, 80),
        (24_000, 90),
        (18_000, 110),
        (58_000, 140),
    ];
    for (decision, (cash, brand)) in strongest_line().into_iter().zip(expected) {
        let outcome = session.decide(decision).expect("decision on its own stage");
        assert_eq!(outcome.status, GameStatus::Playing, "{decision}");
        assert_eq!(session.state().cash, cash, "{decision}");
        assert_eq!(session.state().brand, brand, "{decision}");
    }

    assert_eq!(session.stage(), Stage::Complete);
    assert_eq!(session.status(), GameStatus::Playing);
    let summary = session.summary().expect("finished run has a summary");
    assert_eq!(summary.ending, Ending::Survivor);
    assert_eq!(summary.headline, "COMMODITY");
    assert_eq!(summary.stage, 9);
    assert_eq!(summary.decisions, 8);

    // start + 8 outcomes + 8 advances + completion notice
    assert_eq!(session.state().logs.len(), 18);
    let latest = session.state().logs.latest().expect("log entries");
    assert_eq!(latest.kind, LogKind::Warning);
    assert!(latest.message.starts_with("SIMULATION COMPLETE"));
    assert!(session.state().logs.contains_message("Advancing to Sector 9"));

    let events = session.drain_events();
    assert!(matches!(events.first(), Some(SessionEvent::SessionStarted { epoch: 0 })));
    let requests: Vec<_> = events
        .iter()
        .filter_map(SessionEvent::feedback_request)
        .collect();
    assert_eq!(requests.len(), 8);
    for (index, request) in requests.iter().enumerate() {
        assert_eq!(usize::from(request.stage), index + 1);
        assert_eq!(request.ticket.sequence as usize, index + 1);
    }
    assert!(events.contains(&SessionEvent::Concluded {
        status: GameStatus::Playing
    }));
}

#[test]
fn commodity_line_goes_bankrupt_at_the_fortress() {
    let mut session = StageSession::new();
    session.start_session();

    for decision in [
        Decision::Positioning(PositioningChoice::PriceDrop),
        Decision::DeployOffer,
        Decision::Messaging(MessagingChoice::Jargon),
        Decision::Content(ContentChoice::HardSell),
        Decision::Hunt,
    ] {
        session.decide(decision).expect("still playing");
    }
    assert_eq!(session.state().cash, 7_500);
    assert_eq!(session.state().brand, -25);
    assert_eq!(session.stage(), Stage::Fortress);

    let outcome = session
        .decide(Decision::Fortress(FortressChoice::Rolex))
        .expect("decision on its own stage");
    assert_eq!(outcome.status, GameStatus::Lost);
    assert!(!outcome.advanced);
    assert_eq!(session.stage(), Stage::Fortress);
    assert_eq!(session.state().cash, -12_500);

    let summary = session.summary().expect("lost run has a summary");
    assert_eq!(summary.ending, Ending::Bankrupt);
    assert_eq!(summary.headline, "BANKRUPT");
    assert_eq!(summary.stage, 6);

    let latest = session.state().logs.latest().expect("log entries");
    assert_eq!(latest.kind, LogKind::Error);
    assert!(latest.message.starts_with("RUNWAY EXHAUSTED"));

    assert!(
        session
            .decide(Decision::Fortress(FortressChoice::Reinvest))
            .is_err()
    );
    assert_eq!(session.state().cash, -12_500);
}

#[test]
fn reset_mid_campaign_starts_a_fresh_run() {
    let mut session = StageSession::new();
    session.start_session();
    session
        .decide(Decision::Positioning(PositioningChoice::MoreFeatures))
        .expect("positioning");
    let stale = session.decide(Decision::DeployOffer).expect("offer").ticket;

    session.reset_session();
    assert_eq!(session.stage(), Stage::Intro);
    assert_eq!(session.state().cash, 10_000);
    assert!(session.state().logs.is_empty());
    assert!(!session.deliver_feedback(stale, "stale advice"));

    assert!(session.start_session());
    let fresh = session
        .decide(Decision::Positioning(PositioningChoice::NicheDown))
        .expect("positioning after reset");
    assert_eq!(fresh.ticket.epoch, 1);
    assert_eq!(fresh.ticket.sequence, 1);
    assert!(session.deliver_feedback(fresh.ticket, "Good. Now build the offer."));
    assert_eq!(session.consultant().message(), "Good. Now build the offer.");
}
