use super::*;

#[test]
fn test_caller_errors() {
    assert!(SessionError::SessionNotFound("x".into()).is_caller_error());
    assert!(SessionError::GameAlreadyOver.is_caller_error());
    assert!(SessionError::UnknownBot("zed".into()).is_caller_error());
    assert!(SessionError::NotYourTurn.is_caller_error());
    assert!(SessionError::from(ChessError::IllegalMove("e2e5".into())).is_caller_error());
    assert!(SessionError::from(ChessError::MalformedToken("zz".into())).is_caller_error());
    assert!(SessionError::from(ChessError::InvalidFen("bad".into())).is_caller_error());
}

#[test]
fn test_server_errors() {
    let corrupt = ChessError::CorruptHistory {
        ply: 3,
        token: "e1e3".into(),
    };
    assert!(!SessionError::from(corrupt).is_caller_error());
    assert!(!SessionError::from(OracleError::NoMove).is_caller_error());
    assert!(!SessionError::from(StorageError::LockPoisoned).is_caller_error());
}

#[test]
fn test_chess_error_message_is_transparent() {
    let err = SessionError::from(ChessError::IllegalMove("e2e5".into()));
    assert_eq!(err.to_string(), ChessError::IllegalMove("e2e5".into()).to_string());
}
