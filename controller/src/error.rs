// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use thiserror::Error as DError;

#[derive(Debug, Clone, PartialEq, DError)]
pub enum ErrorKind {
    #[error("Couldn't found entity with id({0})")]
    NotFoundById(String),

    #[error("Couldn't found entity with name({0})")]
    NotFoundByName(String),

    #[error("Couldn't found entity with {0}({1})")]
    NotFoundByCustom(String, String),

    #[error("Controller function not implemented")]
    NotImplemented,

    #[error("An entity with id({0}) already exists")]
    DuplicateEntity(String),

    #[error("Invalid review category ({0})")]
    InvalidCategory(String),

    #[error("Rating {0} is outside the valid range [0, 5]")]
    RatingOutOfRange(f64),

    #[error("Users can't vote on their own review")]
    SelfVote,

    #[error("Couldn't find a vote by user({0}) on review({1})")]
    VoteNotFound(String, String),
}
