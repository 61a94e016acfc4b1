use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use spellbee::countdown::CountdownStatus;
use spellbee::runtime::AppEvent;

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

// Headless integration using the internal runtime + session without a TTY.
// Verifies a minimal practice flow completes via Runner/TestEventSource.
#[test]
fn headless_practice_flow_completes() {
    let list = spellbee::wordlist::WordList::from_lines(["cat", "dog", "fish"]);
    let mut session = spellbee::session::PracticeSession::start(&list, 10, false).unwrap();

    let (tx, rx) = mpsc::channel();
    let es = spellbee::runtime::TestEventSource::new(rx);
    let ticker = spellbee::runtime::FixedTicker::new(Duration::from_millis(5));
    let runner = spellbee::runtime::Runner::new(es, ticker);

    // Reveal then advance through all three items.
    for _ in 0..3 {
        tx.send(key('r')).unwrap();
        tx.send(key('n')).unwrap();
    }

    for _ in 0..100u32 {
        match runner.step() {
            AppEvent::Tick | AppEvent::Resize => {}
            AppEvent::Key(event) => match event.code {
                KeyCode::Char('r') => session.reveal(),
                KeyCode::Char('n') => {
                    session.advance();
                    if session.is_complete() {
                        break;
                    }
                }
                _ => {}
            },
        }
    }

    assert!(session.is_complete(), "session should have finished");
    assert_eq!(
        session.items(),
        &["cat".to_string(), "dog".to_string(), "fish".to_string()]
    );
    assert_eq!(session.current_index(), 2);
}

#[test]
fn headless_auto_reveal_fires_once_on_ticks() {
    let list = spellbee::wordlist::WordList::from_lines(["accommodate"]);
    let mut session = spellbee::session::PracticeSession::start(&list, 10, false).unwrap();
    let mut countdown = Some(spellbee::countdown::RevealCountdown::new(1));

    // No key senders; every step times out into a tick.
    let (_tx, rx) = mpsc::channel();
    let es = spellbee::runtime::TestEventSource::new(rx);
    let ticker = spellbee::runtime::FixedTicker::new(Duration::from_millis(5));
    let runner = spellbee::runtime::Runner::new(es, ticker);

    let mut fired = 0;
    for _ in 0..30u32 {
        if let AppEvent::Tick = runner.step() {
            let elapsed = countdown
                .as_mut()
                .is_some_and(|c| c.tick(Duration::from_millis(100)) == CountdownStatus::Elapsed);
            if elapsed {
                countdown = None;
                session.reveal();
                fired += 1;
            }
        }
    }

    assert_eq!(fired, 1, "an elapsed countdown reveals exactly once");
    assert!(session.is_revealed());
    assert!(countdown.is_none());
}

#[test]
fn headless_advance_cancels_a_pending_reveal() {
    let list = spellbee::wordlist::WordList::from_lines(["cat", "dog"]);
    let mut session = spellbee::session::PracticeSession::start(&list, 10, false).unwrap();
    let mut countdown = Some(spellbee::countdown::RevealCountdown::new(3));

    let (tx, rx) = mpsc::channel();
    let es = spellbee::runtime::TestEventSource::new(rx);
    let ticker = spellbee::runtime::FixedTicker::new(Duration::from_millis(5));
    let runner = spellbee::runtime::Runner::new(es, ticker);

    // The queued key is delivered before any timeout tick.
    tx.send(key('n')).unwrap();

    for _ in 0..40u32 {
        match runner.step() {
            AppEvent::Key(event) if event.code == KeyCode::Char('n') => {
                session.advance();
                countdown = None;
            }
            AppEvent::Tick => {
                let elapsed = countdown
                    .as_mut()
                    .is_some_and(|c| c.tick(Duration::from_millis(100)) == CountdownStatus::Elapsed);
                if elapsed {
                    countdown = None;
                    session.reveal();
                }
            }
            _ => {}
        }
    }

    // Four simulated seconds passed; the cancelled countdown never revealed.
    assert!(!session.is_revealed());
    assert_eq!(session.progress(), (2, 2));
    assert!(countdown.is_none());
}
