use core::{
    num::TryFromIntError,
    result,
};

/// Перечисление для возможных ошибок.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// Заданное целое значение не помещается в указанный тип.
    Int(TryFromIntError),

    /// Задано недопустимое значение аргумента.
    /// Например, тактовая частота, при которой в миллисекунде меньше одного такта.
    InvalidArgument,
}

impl From<TryFromIntError> for Error {
    fn from(e: TryFromIntError) -> Self {
        Error::Int(e)
    }
}

/// Тип возвращаемого результата `T` или ошибки [`Error`] ---
/// мономорфизация [`result::Result`] по типу ошибки.
pub type Result<T> = result::Result<T, Error>;
